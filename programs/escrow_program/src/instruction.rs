//! Instruction payloads and client-side builders.
//!
//! Every payload starts with an eight byte [discriminator] followed by
//! fixed-width little-endian arguments.
//!
//! [discriminator]: crate::discriminator

use bytemuck::Pod;
use bytemuck::Zeroable;
use pina_pod_primitives::PodU64;
use swap_ledger::AccountMeta;
use swap_ledger::Address;
use swap_ledger::Instruction;
use swap_ledger::ProgramError;
use swap_ledger::associated_token;
use swap_ledger::system;
use swap_ledger::token;

use crate::ID;
use crate::discriminator::DISCRIMINATOR_LEN;
use crate::discriminator::MAKE_OFFER;
use crate::discriminator::TAKE_OFFER;
use crate::pda::find_custody_address;
use crate::pda::find_offer_address;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscrowInstruction {
	/// Create an offer and move `offered_amount_a` of asset A into custody.
	MakeOffer {
		id: u64,
		offered_amount_a: u64,
		wanted_amount_b: u64,
	},
	/// Settle an open offer.
	TakeOffer,
}

/// Arguments of `MakeOffer` as they appear after the discriminator.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct MakeOfferArgs {
	id: PodU64,
	offered_amount_a: PodU64,
	wanted_amount_b: PodU64,
}

impl EscrowInstruction {
	pub fn pack(&self) -> Vec<u8> {
		match self {
			Self::MakeOffer {
				id,
				offered_amount_a,
				wanted_amount_b,
			} => {
				let args = MakeOfferArgs {
					id: PodU64::from_primitive(*id),
					offered_amount_a: PodU64::from_primitive(*offered_amount_a),
					wanted_amount_b: PodU64::from_primitive(*wanted_amount_b),
				};
				let mut data = MAKE_OFFER.to_vec();
				data.extend_from_slice(bytemuck::bytes_of(&args));
				data
			}
			Self::TakeOffer => TAKE_OFFER.to_vec(),
		}
	}

	/// Decode a payload. Unknown discriminators and payloads of the wrong
	/// length are rejected.
	pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
		let (discriminator, rest) = data
			.split_first_chunk::<DISCRIMINATOR_LEN>()
			.ok_or(ProgramError::InvalidInstructionData)?;

		match *discriminator {
			MAKE_OFFER => {
				let args: &MakeOfferArgs = bytemuck::try_from_bytes(rest)
					.map_err(|_| ProgramError::InvalidInstructionData)?;
				Ok(Self::MakeOffer {
					id: u64::from(args.id),
					offered_amount_a: u64::from(args.offered_amount_a),
					wanted_amount_b: u64::from(args.wanted_amount_b),
				})
			}
			TAKE_OFFER if rest.is_empty() => Ok(Self::TakeOffer),
			_ => Err(ProgramError::InvalidInstructionData),
		}
	}
}

/// Build a `MakeOffer` instruction, deriving the offer record, custody
/// account and the maker's asset A account locally.
///
/// # Panics
///
/// Panics if an address has no valid derivation.
pub fn make_offer(
	maker: &Address,
	asset_a_kind: &Address,
	asset_b_kind: &Address,
	id: u64,
	offered_amount_a: u64,
	wanted_amount_b: u64,
) -> Instruction {
	let (offer, _) = find_offer_address(maker, id);
	let custody = find_custody_address(&offer, asset_a_kind);
	let maker_asset_a = associated_token::get_associated_token_address(maker, asset_a_kind);

	Instruction::new(
		ID,
		vec![
			AccountMeta::new(*maker, true),
			AccountMeta::new_readonly(*asset_a_kind, false),
			AccountMeta::new_readonly(*asset_b_kind, false),
			AccountMeta::new(maker_asset_a, false),
			AccountMeta::new(offer, false),
			AccountMeta::new(custody, false),
			AccountMeta::new_readonly(system::ID, false),
			AccountMeta::new_readonly(token::ID, false),
			AccountMeta::new_readonly(associated_token::ID, false),
		],
		EscrowInstruction::MakeOffer {
			id,
			offered_amount_a,
			wanted_amount_b,
		}
		.pack(),
	)
}

/// Build a `TakeOffer` instruction for the offer `(maker, id)`, deriving
/// every other address locally.
///
/// # Panics
///
/// Panics if an address has no valid derivation.
pub fn take_offer(
	taker: &Address,
	maker: &Address,
	asset_a_kind: &Address,
	asset_b_kind: &Address,
	id: u64,
) -> Instruction {
	let (offer, _) = find_offer_address(maker, id);
	let custody = find_custody_address(&offer, asset_a_kind);
	let taker_asset_a = associated_token::get_associated_token_address(taker, asset_a_kind);
	let taker_asset_b = associated_token::get_associated_token_address(taker, asset_b_kind);
	let maker_asset_b = associated_token::get_associated_token_address(maker, asset_b_kind);

	Instruction::new(
		ID,
		vec![
			AccountMeta::new(*taker, true),
			AccountMeta::new(*maker, false),
			AccountMeta::new_readonly(*asset_a_kind, false),
			AccountMeta::new_readonly(*asset_b_kind, false),
			AccountMeta::new(taker_asset_a, false),
			AccountMeta::new(taker_asset_b, false),
			AccountMeta::new(maker_asset_b, false),
			AccountMeta::new(offer, false),
			AccountMeta::new(custody, false),
			AccountMeta::new_readonly(system::ID, false),
			AccountMeta::new_readonly(token::ID, false),
			AccountMeta::new_readonly(associated_token::ID, false),
		],
		EscrowInstruction::TakeOffer.pack(),
	)
}
