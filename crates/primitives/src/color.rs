/// Raw item color meaning "no color assigned".
pub const DEFCOLOR: u32 = 0xFFFF_FFFF;

/// A color in `0xRRGGBB` order, the form the `__color__` tag exposes.
///
/// The host stores item colors as `0xBBGGRR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(u32);

impl Rgb {
	/// Largest representable color.
	pub const MAX: u32 = 0x00FF_FFFF;

	/// Wraps a `0xRRGGBB` value, or `None` if it has bits above the low 24.
	pub fn new(rgb: u32) -> Option<Self> {
		(rgb <= Self::MAX).then_some(Self(rgb))
	}

	/// Returns the `0xRRGGBB` value.
	#[inline]
	pub fn get(self) -> u32 {
		self.0
	}

	/// Converts from the host's raw item color.
	pub fn from_item_color(raw: u32) -> Option<Self> {
		if raw == DEFCOLOR {
			return None;
		}
		Some(Self(swap_red_blue(raw)))
	}

	/// Converts to the host's raw item color.
	pub fn to_item_color(self) -> u32 {
		swap_red_blue(self.0)
	}
}

fn swap_red_blue(c: u32) -> u32 {
	let high = (c & 0x00FF_0000) >> 16;
	let low = c & 0x0000_00FF;
	(low << 16) | (c & 0x0000_FF00) | high
}
