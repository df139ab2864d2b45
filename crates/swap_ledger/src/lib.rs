//! An in-process, account-based ledger.
//!
//! The ledger stores accounts keyed by [`Address`] and executes
//! [`Transaction`]s against them one unit-of-work at a time: every account a
//! transaction touches is locked, loaded into a staging buffer, mutated by the
//! programs its instructions address, and committed only when every
//! instruction succeeds. Unrelated transactions never contend because locking
//! is per account.
//!
//! Three builtin programs are always installed:
//!
//! - [`system`]: account creation and lamport transfers.
//! - [`token`]: fungible asset mints and balances.
//! - [`associated_token`]: deterministic per-owner asset accounts.
//!
//! Additional programs implement [`Program`] and are installed with
//! [`Ledger::register`].

mod account;
pub mod associated_token;
mod error;
mod invoke;
mod ledger;
mod locks;
pub mod pod;
pub mod rent;
pub mod system;
pub mod token;
mod validation;

pub use solana_address::Address;
#[cfg(feature = "logs")]
pub use solana_program_log;

pub use crate::account::*;
pub use crate::error::*;
pub use crate::invoke::*;
pub use crate::ledger::*;
pub use crate::locks::AccountLockGuard;
pub use crate::validation::*;

/// Owner of the builtin program accounts.
pub mod native_loader {
	solana_address::declare_id!("NativeLoader1111111111111111111111111111111");
}

#[cfg(feature = "logs")]
#[macro_export]
macro_rules! log {
	($($arg:tt)*) => {
		$crate::solana_program_log::log!($($arg)*);
	};
}

#[cfg(not(feature = "logs"))]
#[macro_export]
macro_rules! log {
	($($arg:tt)*) => {};
}
