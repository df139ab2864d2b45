use bytemuck::Pod;
use bytemuck::Zeroable;
use pina_pod_primitives::PodU64;

use super::TokenError;
use crate::Address;
use crate::ProgramError;
use crate::pod::PodOptionTag;

/// Lifecycle of an asset account, stored as a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AccountState {
	Uninitialized = 0,
	Initialized = 1,
	Frozen = 2,
}

/// An asset definition.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct Mint {
	pub mint_authority_tag: PodOptionTag,
	/// Only meaningful when `mint_authority_tag` is some.
	pub mint_authority: Address,
	pub supply: PodU64,
	pub decimals: u8,
	pub is_initialized: u8,
	pub freeze_authority_tag: PodOptionTag,
	pub freeze_authority: Address,
}

const _: () = assert!(Mint::LEN == 82);

impl Mint {
	pub const LEN: usize = size_of::<Self>();

	/// Read an initialised mint.
	pub fn unpack(data: &[u8]) -> Result<&Self, ProgramError> {
		let mint = Self::unpack_unchecked(data)?;
		if !mint.is_initialized() {
			return Err(TokenError::UninitializedState.into());
		}

		Ok(mint)
	}

	pub fn unpack_unchecked(data: &[u8]) -> Result<&Self, ProgramError> {
		bytemuck::try_from_bytes(data).map_err(|_| ProgramError::InvalidAccountData)
	}

	pub fn unpack_mut(data: &mut [u8]) -> Result<&mut Self, ProgramError> {
		let mint = Self::unpack_unchecked_mut(data)?;
		if !mint.is_initialized() {
			return Err(TokenError::UninitializedState.into());
		}

		Ok(mint)
	}

	pub fn unpack_unchecked_mut(data: &mut [u8]) -> Result<&mut Self, ProgramError> {
		bytemuck::try_from_bytes_mut(data).map_err(|_| ProgramError::InvalidAccountData)
	}

	pub fn is_initialized(&self) -> bool {
		self.is_initialized == 1
	}

	pub fn mint_authority(&self) -> Option<&Address> {
		self.mint_authority_tag
			.is_some()
			.then_some(&self.mint_authority)
	}

	pub fn freeze_authority(&self) -> Option<&Address> {
		self.freeze_authority_tag
			.is_some()
			.then_some(&self.freeze_authority)
	}

	pub fn supply(&self) -> u64 {
		u64::from(self.supply)
	}
}

/// A balance of one asset held for one owner.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct TokenAccount {
	pub mint: Address,
	/// The identity allowed to move the balance.
	pub owner: Address,
	pub amount: PodU64,
	pub delegate_tag: PodOptionTag,
	pub delegate: Address,
	pub state: u8,
	pub is_native_tag: PodOptionTag,
	pub is_native: PodU64,
	pub delegated_amount: PodU64,
	pub close_authority_tag: PodOptionTag,
	pub close_authority: Address,
}

const _: () = assert!(TokenAccount::LEN == 165);

impl TokenAccount {
	pub const LEN: usize = size_of::<Self>();

	/// Read an initialised asset account.
	pub fn unpack(data: &[u8]) -> Result<&Self, ProgramError> {
		let account = Self::unpack_unchecked(data)?;
		if !account.is_initialized() {
			return Err(TokenError::UninitializedState.into());
		}

		Ok(account)
	}

	pub fn unpack_unchecked(data: &[u8]) -> Result<&Self, ProgramError> {
		bytemuck::try_from_bytes(data).map_err(|_| ProgramError::InvalidAccountData)
	}

	pub fn unpack_mut(data: &mut [u8]) -> Result<&mut Self, ProgramError> {
		let account = Self::unpack_unchecked_mut(data)?;
		if !account.is_initialized() {
			return Err(TokenError::UninitializedState.into());
		}

		Ok(account)
	}

	pub fn unpack_unchecked_mut(data: &mut [u8]) -> Result<&mut Self, ProgramError> {
		bytemuck::try_from_bytes_mut(data).map_err(|_| ProgramError::InvalidAccountData)
	}

	pub fn is_initialized(&self) -> bool {
		self.state != AccountState::Uninitialized as u8
	}

	pub fn is_frozen(&self) -> bool {
		self.state == AccountState::Frozen as u8
	}

	pub fn amount(&self) -> u64 {
		u64::from(self.amount)
	}

	pub fn close_authority(&self) -> Option<&Address> {
		self.close_authority_tag
			.is_some()
			.then_some(&self.close_authority)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zeroed_accounts_are_uninitialized() {
		let data = [0u8; TokenAccount::LEN];
		assert_eq!(
			TokenAccount::unpack(&data).map(|_| ()),
			Err(ProgramError::Token(TokenError::UninitializedState))
		);
		assert!(TokenAccount::unpack_unchecked(&data).is_ok());
	}

	#[test]
	fn wrong_length_is_invalid_account_data() {
		assert_eq!(
			Mint::unpack(&[1u8; 81]).map(|_| ()),
			Err(ProgramError::InvalidAccountData)
		);
		assert_eq!(
			TokenAccount::unpack(&[1u8; 166]).map(|_| ()),
			Err(ProgramError::InvalidAccountData)
		);
	}

	#[test]
	fn field_offsets_match_the_ledger_layout() {
		let mut data = [0u8; TokenAccount::LEN];
		data[64..72].copy_from_slice(&500u64.to_le_bytes());
		data[108] = AccountState::Initialized as u8;

		let account = TokenAccount::unpack(&data).unwrap_or_else(|e| panic!("unpack: {e}"));
		assert_eq!(account.amount(), 500);
		assert!(!account.is_frozen());
		assert_eq!(account.close_authority(), None);
	}

	#[test]
	fn mint_authority_follows_the_tag() {
		let mut data = [0u8; Mint::LEN];
		data[..4].copy_from_slice(&[1, 0, 0, 0]);
		data[4..36].copy_from_slice(&[7; 32]);
		data[44] = 6;
		data[45] = 1;

		let mint = Mint::unpack(&data).unwrap_or_else(|e| panic!("unpack: {e}"));
		assert_eq!(
			mint.mint_authority(),
			Some(&Address::new_from_array([7; 32]))
		);
		assert_eq!(mint.decimals, 6);
		assert_eq!(mint.freeze_authority(), None);
	}
}
