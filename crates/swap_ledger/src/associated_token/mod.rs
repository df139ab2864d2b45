//! The builtin associated-account program.
//!
//! Every `(wallet, mint)` pair has exactly one canonical asset account whose
//! address is derived from the pair, so anyone can find (and create) it
//! without being told where it lives.

mod processor;

pub use processor::AssociatedTokenProgram;

use crate::AccountMeta;
use crate::Address;
use crate::Instruction;
use crate::system;
use crate::token;

solana_address::declare_id!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

const CREATE: u8 = 0;
const CREATE_IDEMPOTENT: u8 = 1;

/// Derive the associated asset account of `wallet` for `mint` and its bump.
///
/// Returns `None` if no valid bump exists.
pub fn try_find_associated_token_address(wallet: &Address, mint: &Address) -> Option<(Address, u8)> {
	Address::try_find_program_address(&[wallet.as_ref(), token::ID.as_ref(), mint.as_ref()], &ID)
}

/// Derive the associated asset account of `wallet` for `mint`.
///
/// # Panics
///
/// Panics if no valid bump exists. Use
/// [`try_find_associated_token_address`] to handle that case.
pub fn get_associated_token_address(wallet: &Address, mint: &Address) -> Address {
	try_find_associated_token_address(wallet, mint)
		.map(|(address, _)| address)
		.unwrap_or_else(|| panic!("could not find an associated token address"))
}

/// Create the associated asset account of `wallet` for `mint`, failing if it
/// already exists.
pub fn create(payer: &Address, wallet: &Address, mint: &Address) -> Instruction {
	let associated = get_associated_token_address(wallet, mint);
	create_instruction(payer, &associated, wallet, mint, false)
}

/// Create the associated asset account of `wallet` for `mint` unless a
/// matching one already exists.
pub fn create_idempotent(payer: &Address, wallet: &Address, mint: &Address) -> Instruction {
	let associated = get_associated_token_address(wallet, mint);
	create_instruction(payer, &associated, wallet, mint, true)
}

/// Build a create instruction for an already derived `associated` address.
///
/// Programs that have validated the derivation themselves use this to avoid
/// deriving the address a second time.
pub fn create_instruction(
	payer: &Address,
	associated: &Address,
	wallet: &Address,
	mint: &Address,
	idempotent: bool,
) -> Instruction {
	let tag = if idempotent { CREATE_IDEMPOTENT } else { CREATE };

	Instruction::new(
		ID,
		vec![
			AccountMeta::new(*payer, true),
			AccountMeta::new(*associated, false),
			AccountMeta::new_readonly(*wallet, false),
			AccountMeta::new_readonly(*mint, false),
			AccountMeta::new_readonly(system::ID, false),
			AccountMeta::new_readonly(token::ID, false),
		],
		vec![tag],
	)
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	proptest! {
		#[test]
		fn derivation_is_deterministic(wallet in any::<[u8; 32]>(), mint in any::<[u8; 32]>()) {
			let wallet = Address::new_from_array(wallet);
			let mint = Address::new_from_array(mint);

			let first = try_find_associated_token_address(&wallet, &mint);
			let second = try_find_associated_token_address(&wallet, &mint);
			prop_assert_eq!(first, second);
		}

		#[test]
		fn distinct_mints_have_distinct_accounts(wallet in any::<[u8; 32]>(), a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
			prop_assume!(a != b);
			let wallet = Address::new_from_array(wallet);

			prop_assert_ne!(
				get_associated_token_address(&wallet, &Address::new_from_array(a)),
				get_associated_token_address(&wallet, &Address::new_from_array(b))
			);
		}
	}

	#[test]
	fn instruction_lists_the_derived_account() {
		let payer = Address::new_from_array([1; 32]);
		let wallet = Address::new_from_array([2; 32]);
		let mint = Address::new_from_array([3; 32]);

		let instruction = create_idempotent(&payer, &wallet, &mint);
		assert_eq!(instruction.data, vec![CREATE_IDEMPOTENT]);
		assert_eq!(
			instruction.accounts[1].address,
			get_associated_token_address(&wallet, &mint)
		);
		assert!(instruction.accounts[0].is_signer);
	}
}
