use bytemuck::Pod;
use bytemuck::Zeroable;
use pina_pod_primitives::PodU64;

use super::ID;
use crate::AccountMeta;
use crate::Address;
use crate::Instruction;
use crate::ProgramError;

const CREATE_ACCOUNT: u32 = 0;
const TRANSFER: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemInstruction {
	/// Create a new account.
	///
	/// Accounts:
	/// 0. `[writable, signer]` funding account
	/// 1. `[writable, signer]` new account
	CreateAccount {
		lamports: u64,
		space: u64,
		owner: Address,
	},
	/// Move lamports between system accounts.
	///
	/// Accounts:
	/// 0. `[writable, signer]` source
	/// 1. `[writable]` destination
	Transfer { lamports: u64 },
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct CreateAccountArgs {
	lamports: PodU64,
	space: PodU64,
	owner: Address,
}

impl SystemInstruction {
	/// Encode as a little-endian `u32` tag followed by the arguments.
	pub fn pack(&self) -> Vec<u8> {
		match self {
			Self::CreateAccount {
				lamports,
				space,
				owner,
			} => {
				let args = CreateAccountArgs {
					lamports: PodU64::from_primitive(*lamports),
					space: PodU64::from_primitive(*space),
					owner: *owner,
				};
				let mut data = CREATE_ACCOUNT.to_le_bytes().to_vec();
				data.extend_from_slice(bytemuck::bytes_of(&args));
				data
			}
			Self::Transfer { lamports } => {
				let mut data = TRANSFER.to_le_bytes().to_vec();
				data.extend_from_slice(&lamports.to_le_bytes());
				data
			}
		}
	}

	pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
		let (tag, rest) = data
			.split_first_chunk::<4>()
			.ok_or(ProgramError::InvalidInstructionData)?;

		match u32::from_le_bytes(*tag) {
			CREATE_ACCOUNT => {
				let args: &CreateAccountArgs = bytemuck::try_from_bytes(rest)
					.map_err(|_| ProgramError::InvalidInstructionData)?;
				Ok(Self::CreateAccount {
					lamports: u64::from(args.lamports),
					space: u64::from(args.space),
					owner: args.owner,
				})
			}
			TRANSFER => {
				let lamports = <[u8; 8]>::try_from(rest)
					.map_err(|_| ProgramError::InvalidInstructionData)?;
				Ok(Self::Transfer {
					lamports: u64::from_le_bytes(lamports),
				})
			}
			_ => Err(ProgramError::InvalidInstructionData),
		}
	}
}

/// Create `to` with `space` zeroed bytes owned by `owner`, funded by `from`.
pub fn create_account(
	from: &Address,
	to: &Address,
	lamports: u64,
	space: u64,
	owner: &Address,
) -> Instruction {
	Instruction::new(
		ID,
		vec![AccountMeta::new(*from, true), AccountMeta::new(*to, true)],
		SystemInstruction::CreateAccount {
			lamports,
			space,
			owner: *owner,
		}
		.pack(),
	)
}

pub fn transfer(from: &Address, to: &Address, lamports: u64) -> Instruction {
	Instruction::new(
		ID,
		vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
		SystemInstruction::Transfer { lamports }.pack(),
	)
}
