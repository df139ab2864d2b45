//! Reserved deposits ("rent exemption") for stored accounts.
//!
//! An account that holds data must keep a minimum lamport balance
//! proportional to its size for as long as it exists. Closing the account
//! releases that deposit to whoever the closing instruction names.

use typed_builder::TypedBuilder;

/// Bytes charged for every account on top of its data.
pub const ACCOUNT_STORAGE_OVERHEAD: u64 = 128;
pub const DEFAULT_LAMPORTS_PER_BYTE_YEAR: u64 = 3_480;
pub const DEFAULT_EXEMPTION_THRESHOLD_YEARS: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
pub struct Rent {
	#[builder(default = DEFAULT_LAMPORTS_PER_BYTE_YEAR)]
	pub lamports_per_byte_year: u64,
	#[builder(default = DEFAULT_EXEMPTION_THRESHOLD_YEARS)]
	pub exemption_threshold_years: u64,
}

impl Default for Rent {
	fn default() -> Self {
		Self::builder().build()
	}
}

impl Rent {
	/// Minimum lamports an account with `data_len` bytes must hold.
	pub fn minimum_balance(&self, data_len: usize) -> u64 {
		(ACCOUNT_STORAGE_OVERHEAD.saturating_add(data_len as u64))
			.saturating_mul(self.lamports_per_byte_year)
			.saturating_mul(self.exemption_threshold_years)
	}

	pub fn is_exempt(&self, lamports: u64, data_len: usize) -> bool {
		lamports >= self.minimum_balance(data_len)
	}
}
