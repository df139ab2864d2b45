//! The builtin system program: account creation and lamport transfers.

mod instruction;
mod processor;

pub use instruction::*;
pub use processor::SystemProgram;

solana_address::declare_id!("11111111111111111111111111111111");

/// Largest data length an account may be created with.
pub const MAX_PERMITTED_DATA_LENGTH: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[repr(u32)]
pub enum SystemError {
	#[error("an account with the same address already exists")]
	AccountAlreadyInUse = 0,
	#[error("account does not have enough lamports to perform the operation")]
	ResultWithNegativeLamports = 1,
	#[error("cannot allocate account data of this length")]
	InvalidAccountDataLength = 3,
}
