//! Read-only helpers for callers holding a [`Ledger`].

use swap_ledger::Address;
use swap_ledger::Ledger;
use swap_ledger::ProgramError;

use crate::ID;
use crate::pda::find_offer_address;
use crate::state::Offer;

/// Load the offer record stored at `address`.
///
/// Returns `Ok(None)` when nothing is stored there, which is also the state
/// of an offer that has already been taken.
pub fn fetch_offer(ledger: &Ledger, address: &Address) -> Result<Option<Offer>, ProgramError> {
	let Some(account) = ledger.get_account(address) else {
		return Ok(None);
	};
	if account.owner != ID {
		return Err(ProgramError::IllegalOwner);
	}

	Offer::try_from_bytes(&account.data).map(|offer| Some(*offer))
}

/// Load the offer record of `(maker, id)`.
///
/// # Panics
///
/// Panics if the offer address has no valid derivation.
pub fn fetch_offer_by_id(
	ledger: &Ledger,
	maker: &Address,
	id: u64,
) -> Result<Option<Offer>, ProgramError> {
	let (address, _) = find_offer_address(maker, id);
	fetch_offer(ledger, &address)
}

/// Asset balance of the asset account at `address`, zero if it does not
/// exist.
pub fn token_balance(ledger: &Ledger, address: &Address) -> u64 {
	ledger
		.token_account(address)
		.map_or(0, |account| account.amount())
}
