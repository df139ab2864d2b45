//! Layout pieces of the ledger-native account formats that the shared
//! primitive wrappers do not cover.

use bytemuck::Pod;
use bytemuck::Zeroable;

/// Four byte presence tag used by the ledger-native optional fields
/// (`0` = none, `1` = some).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(transparent)]
pub struct PodOptionTag(pub [u8; 4]);

impl PodOptionTag {
	pub const NONE: Self = Self([0; 4]);
	pub const SOME: Self = Self([1, 0, 0, 0]);

	pub const fn from_bool(present: bool) -> Self {
		if present { Self::SOME } else { Self::NONE }
	}

	pub fn is_some(self) -> bool {
		self == Self::SOME
	}
}
