//! Escrow offers: a trustless swap of two fungible assets between a maker and
//! any taker.
//!
//! A maker locks `offered_amount_a` of asset A into a custody account whose
//! only authority is the offer record's own derived address, and publishes
//! how much of asset B it wants in return. Any taker can then settle the
//! offer in one atomic transaction: asset B goes to the maker, the custodied
//! asset A goes to the taker, and both the custody account and the offer
//! record are closed with their deposits returned to the maker.
//!
//! ## Instructions
//!
//! | Instruction  | Description                                          |
//! |--------------|------------------------------------------------------|
//! | `MakeOffer`  | Create an offer record and move asset A into custody. |
//! | `TakeOffer`  | Pay asset B, receive asset A, close the offer.        |
//!
//! Both addresses a taker needs can be recomputed from public data, see
//! [`pda`].

use swap_ledger::AccountMeta;
use swap_ledger::Address;
use swap_ledger::InvokeContext;
use swap_ledger::Program;
use swap_ledger::ProgramResult;

pub mod client;
pub mod discriminator;
mod error;
pub mod instruction;
pub mod pda;
mod processor;
pub mod state;

pub use crate::error::*;
pub use crate::processor::*;

// The address this program is registered under.
solana_address::declare_id!("9VdKGKXs5ZJd6Cr9GtJcPP8fdUSmRgvkYScvhi1oPkFc");

/// The escrow program, ready to be installed with
/// [`swap_ledger::Ledger::register`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EscrowProgram;

impl Program for EscrowProgram {
	fn id(&self) -> Address {
		ID
	}

	fn process(
		&self,
		ctx: &mut InvokeContext<'_>,
		accounts: &[AccountMeta],
		data: &[u8],
	) -> ProgramResult {
		process_instruction(ctx, accounts, data)
	}
}
