//! Address derivation for offer records and their custody accounts.
//!
//! Both addresses are pure functions of public data, so clients, indexers and
//! takers can find an offer without a directory:
//!
//! - offer record: `find_program_address(["offer", maker, id_le], escrow::ID)`
//! - custody account: the associated asset account of `(offer, asset_a_kind)`

use swap_ledger::Address;
use swap_ledger::ProgramError;
use swap_ledger::associated_token;

use crate::ID;

/// Seed prefix for offer records.
pub const OFFER_SEED: &[u8] = b"offer";

/// Build the seeds of an offer record.
///
/// Seeds: `["offer", <maker>, <id as 8 little-endian bytes>]`
///
/// With bump: `["offer", <maker>, <id>, &[bump]]`
#[macro_export]
macro_rules! offer_seeds {
	($maker:expr, $id:expr) => {
		&[$crate::pda::OFFER_SEED, $maker, $id]
	};
	($maker:expr, $id:expr, $bump:expr) => {
		&[$crate::pda::OFFER_SEED, $maker, $id, $bump]
	};
}

/// Derive the offer record address of `(maker, id)` and its bump.
///
/// Returns `None` if no valid bump exists.
pub fn try_find_offer_address(maker: &Address, id: u64) -> Option<(Address, u8)> {
	let id = id.to_le_bytes();
	let seeds: &[&[u8]] = offer_seeds!(maker.as_ref(), &id);
	Address::try_find_program_address(seeds, &ID)
}

/// Derive the offer record address of `(maker, id)` and its bump.
///
/// # Panics
///
/// Panics if no valid bump exists. Use [`try_find_offer_address`] to handle
/// that case.
pub fn find_offer_address(maker: &Address, id: u64) -> (Address, u8) {
	try_find_offer_address(maker, id)
		.unwrap_or_else(|| panic!("could not find an offer address for id {id}"))
}

/// Recompute an offer record address from the fields stored in the record.
pub fn create_offer_address(maker: &Address, id: u64, bump: u8) -> Result<Address, ProgramError> {
	let id = id.to_le_bytes();
	let bump = [bump];
	let seeds: &[&[u8]] = offer_seeds!(maker.as_ref(), &id, &bump);
	Address::create_program_address(seeds, &ID).map_err(|_| ProgramError::InvalidSeeds)
}

/// Derive the custody account of `offer` for asset kind `mint`.
pub fn try_find_custody_address(offer: &Address, mint: &Address) -> Option<(Address, u8)> {
	associated_token::try_find_associated_token_address(offer, mint)
}

/// Derive the custody account of `offer` for asset kind `mint`.
///
/// # Panics
///
/// Panics if no valid bump exists.
pub fn find_custody_address(offer: &Address, mint: &Address) -> Address {
	associated_token::get_associated_token_address(offer, mint)
}
