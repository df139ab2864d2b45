use super::ID;
use super::TokenError;
use crate::AccountMeta;
use crate::Address;
use crate::Instruction;
use crate::ProgramError;

const MINT_TO: u8 = 7;
const CLOSE_ACCOUNT: u8 = 9;
const TRANSFER_CHECKED: u8 = 12;
const INITIALIZE_ACCOUNT3: u8 = 18;
const INITIALIZE_MINT2: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenInstruction {
	/// Accounts:
	/// 0. `[writable]` asset account
	/// 1. `[writable]` destination of the reclaimed deposit
	/// 2. `[signer]` owner or close authority
	CloseAccount,
	/// Accounts:
	/// 0. `[writable]` mint
	/// 1. `[writable]` destination asset account
	/// 2. `[signer]` mint authority
	MintTo { amount: u64 },
	/// Accounts:
	/// 0. `[writable]` source asset account
	/// 1. `[]` mint
	/// 2. `[writable]` destination asset account
	/// 3. `[signer]` source owner
	TransferChecked { amount: u64, decimals: u8 },
	/// Accounts:
	/// 0. `[writable]` asset account to initialise
	/// 1. `[]` mint
	InitializeAccount3 { owner: Address },
	/// Accounts:
	/// 0. `[writable]` mint to initialise
	InitializeMint2 {
		decimals: u8,
		mint_authority: Address,
		freeze_authority: Option<Address>,
	},
}

impl TokenInstruction {
	pub fn pack(&self) -> Vec<u8> {
		let mut data = Vec::new();

		match self {
			Self::CloseAccount => data.push(CLOSE_ACCOUNT),
			Self::MintTo { amount } => {
				data.push(MINT_TO);
				data.extend_from_slice(&amount.to_le_bytes());
			}
			Self::TransferChecked { amount, decimals } => {
				data.push(TRANSFER_CHECKED);
				data.extend_from_slice(&amount.to_le_bytes());
				data.push(*decimals);
			}
			Self::InitializeAccount3 { owner } => {
				data.push(INITIALIZE_ACCOUNT3);
				data.extend_from_slice(owner.as_ref());
			}
			Self::InitializeMint2 {
				decimals,
				mint_authority,
				freeze_authority,
			} => {
				data.push(INITIALIZE_MINT2);
				data.push(*decimals);
				data.extend_from_slice(mint_authority.as_ref());
				match freeze_authority {
					Some(authority) => {
						data.push(1);
						data.extend_from_slice(authority.as_ref());
					}
					None => data.push(0),
				}
			}
		}

		data
	}

	/// Decode instruction data. Trailing bytes are ignored.
	pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
		let (&tag, rest) = input.split_first().ok_or(TokenError::InvalidInstruction)?;

		Ok(match tag {
			CLOSE_ACCOUNT => Self::CloseAccount,
			MINT_TO => {
				let (amount, _) = unpack_u64(rest)?;
				Self::MintTo { amount }
			}
			TRANSFER_CHECKED => {
				let (amount, rest) = unpack_u64(rest)?;
				let (&decimals, _) = rest.split_first().ok_or(TokenError::InvalidInstruction)?;
				Self::TransferChecked { amount, decimals }
			}
			INITIALIZE_ACCOUNT3 => {
				let (owner, _) = unpack_address(rest)?;
				Self::InitializeAccount3 { owner }
			}
			INITIALIZE_MINT2 => {
				let (&decimals, rest) = rest.split_first().ok_or(TokenError::InvalidInstruction)?;
				let (mint_authority, rest) = unpack_address(rest)?;
				let (freeze_authority, _) = unpack_address_option(rest)?;
				Self::InitializeMint2 {
					decimals,
					mint_authority,
					freeze_authority,
				}
			}
			_ => return Err(TokenError::InvalidInstruction.into()),
		})
	}
}

fn unpack_u64(input: &[u8]) -> Result<(u64, &[u8]), ProgramError> {
	let (bytes, rest) = input
		.split_first_chunk::<8>()
		.ok_or(TokenError::InvalidInstruction)?;
	Ok((u64::from_le_bytes(*bytes), rest))
}

fn unpack_address(input: &[u8]) -> Result<(Address, &[u8]), ProgramError> {
	let (bytes, rest) = input
		.split_first_chunk::<32>()
		.ok_or(TokenError::InvalidInstruction)?;
	Ok((Address::new_from_array(*bytes), rest))
}

fn unpack_address_option(input: &[u8]) -> Result<(Option<Address>, &[u8]), ProgramError> {
	match input.split_first() {
		Some((0, rest)) => Ok((None, rest)),
		Some((1, rest)) => {
			let (address, rest) = unpack_address(rest)?;
			Ok((Some(address), rest))
		}
		_ => Err(TokenError::InvalidInstruction.into()),
	}
}

pub fn initialize_mint2(
	mint: &Address,
	mint_authority: &Address,
	freeze_authority: Option<&Address>,
	decimals: u8,
) -> Instruction {
	Instruction::new(
		ID,
		vec![AccountMeta::new(*mint, false)],
		TokenInstruction::InitializeMint2 {
			decimals,
			mint_authority: *mint_authority,
			freeze_authority: freeze_authority.copied(),
		}
		.pack(),
	)
}

pub fn initialize_account3(account: &Address, mint: &Address, owner: &Address) -> Instruction {
	Instruction::new(
		ID,
		vec![
			AccountMeta::new(*account, false),
			AccountMeta::new_readonly(*mint, false),
		],
		TokenInstruction::InitializeAccount3 { owner: *owner }.pack(),
	)
}

pub fn mint_to(
	mint: &Address,
	destination: &Address,
	authority: &Address,
	amount: u64,
) -> Instruction {
	Instruction::new(
		ID,
		vec![
			AccountMeta::new(*mint, false),
			AccountMeta::new(*destination, false),
			AccountMeta::new_readonly(*authority, true),
		],
		TokenInstruction::MintTo { amount }.pack(),
	)
}

pub fn transfer_checked(
	source: &Address,
	mint: &Address,
	destination: &Address,
	authority: &Address,
	amount: u64,
	decimals: u8,
) -> Instruction {
	Instruction::new(
		ID,
		vec![
			AccountMeta::new(*source, false),
			AccountMeta::new_readonly(*mint, false),
			AccountMeta::new(*destination, false),
			AccountMeta::new_readonly(*authority, true),
		],
		TokenInstruction::TransferChecked { amount, decimals }.pack(),
	)
}

pub fn close_account(account: &Address, destination: &Address, authority: &Address) -> Instruction {
	Instruction::new(
		ID,
		vec![
			AccountMeta::new(*account, false),
			AccountMeta::new(*destination, false),
			AccountMeta::new_readonly(*authority, true),
		],
		TokenInstruction::CloseAccount.pack(),
	)
}
