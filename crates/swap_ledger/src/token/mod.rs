//! The builtin token program: fungible asset mints and the accounts that hold
//! their balances.
//!
//! Account layouts, instruction encodings and error codes are
//! ledger-native, so the [`state`] types can be read from raw account data
//! directly.

pub mod instruction;
mod processor;
pub mod state;

pub use processor::TokenProgram;

solana_address::declare_id!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[repr(u32)]
pub enum TokenError {
	#[error("lamport balance below rent-exempt threshold")]
	NotRentExempt = 0,
	#[error("insufficient funds")]
	InsufficientFunds = 1,
	#[error("invalid mint")]
	InvalidMint = 2,
	#[error("account not associated with this mint")]
	MintMismatch = 3,
	#[error("owner does not match")]
	OwnerMismatch = 4,
	#[error("fixed supply")]
	FixedSupply = 5,
	#[error("already in use")]
	AlreadyInUse = 6,
	#[error("state is uninitialized")]
	UninitializedState = 9,
	#[error("non-native account can only be closed if its balance is zero")]
	NonNativeHasBalance = 11,
	#[error("invalid instruction")]
	InvalidInstruction = 12,
	#[error("operation overflowed")]
	Overflow = 14,
	#[error("account is frozen")]
	AccountFrozen = 17,
	#[error("the provided decimals value different from the mint decimals")]
	MintDecimalsMismatch = 18,
}

impl TokenError {
	/// The ledger-native numeric code.
	pub const fn code(self) -> u32 {
		self as u32
	}
}
