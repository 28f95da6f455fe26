use crate::error::CorruptKind;

pub(crate) fn escape_into(name: &str, out: &mut String) {
	for c in name.chars() {
		if matches!(c, '\\' | ']') {
			out.push('\\');
		}
		out.push(c);
	}
}

/// Splits `[name] json` into the unescaped name and the JSON text.
pub(crate) fn split_record(line: &str) -> Result<(String, &str), CorruptKind> {
	let rest = line.strip_prefix('[').ok_or(CorruptKind::NotARecord)?;

	let mut name = String::new();
	let mut chars = rest.char_indices();
	let close = loop {
		match chars.next() {
			None => return Err(CorruptKind::UnterminatedName),
			Some((_, '\\')) => match chars.next() {
				Some((_, c @ ('\\' | ']'))) => name.push(c),
				other => return Err(CorruptKind::BadEscape(other.map(|(_, c)| c))),
			},
			Some((i, ']')) => break i,
			Some((_, c)) => name.push(c),
		}
	};

	let json = rest[close + 1..].strip_prefix(' ').ok_or(CorruptKind::MissingSeparator)?;
	Ok((name, json))
}
