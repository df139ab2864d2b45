use bytemuck::Pod;
use bytemuck::Zeroable;
use pina_pod_primitives::PodU64;
use swap_ledger::Address;
use swap_ledger::ProgramError;
use typed_builder::TypedBuilder;

use crate::discriminator::DISCRIMINATOR_LEN;
use crate::discriminator::OFFER_ACCOUNT;

/// One open offer.
///
/// Layout (121 bytes):
/// ```text
/// | offset | size | field           |
/// |--------|------|-----------------|
/// | 0      | 8    | discriminator   |
/// | 8      | 8    | id              |
/// | 16     | 32   | maker           |
/// | 48     | 32   | asset_a_kind    |
/// | 80     | 32   | asset_b_kind    |
/// | 112    | 8    | wanted_amount_b |
/// | 120    | 1    | bump            |
/// ```
///
/// The amount of asset A on offer is not stored: the custody account's
/// balance is authoritative.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable, TypedBuilder)]
pub struct Offer {
	#[builder(setter(skip), default = OFFER_ACCOUNT)]
	pub discriminator: [u8; DISCRIMINATOR_LEN],
	/// Maker-chosen nonce, part of the record's derived address.
	#[builder(setter(into))]
	pub id: PodU64,
	/// Creator of the offer and recipient of every proceed and deposit.
	pub maker: Address,
	/// The mint held in custody.
	pub asset_a_kind: Address,
	/// The mint the maker wants.
	pub asset_b_kind: Address,
	#[builder(setter(into))]
	pub wanted_amount_b: PodU64,
	/// Bump of the record's derived address.
	pub bump: u8,
}

const _: () = assert!(Offer::LEN == 121);

impl Offer {
	pub const LEN: usize = size_of::<Self>();

	/// Read a record, checking its length and discriminator.
	pub fn try_from_bytes(data: &[u8]) -> Result<&Self, ProgramError> {
		let offer: &Self = bytemuck::try_from_bytes(data).map_err(|_| ProgramError::InvalidAccountData)?;
		if offer.discriminator != OFFER_ACCOUNT {
			return Err(ProgramError::InvalidAccountData);
		}

		Ok(offer)
	}

	pub fn id(&self) -> u64 {
		u64::from(self.id)
	}

	pub fn wanted_amount_b(&self) -> u64 {
		u64::from(self.wanted_amount_b)
	}
}
