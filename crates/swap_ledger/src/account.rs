use crate::Address;
use crate::native_loader;
use crate::system;

/// A stored account.
///
/// An account with no lamports and no data does not exist: loading a missing
/// address yields [`Account::default`], and committing an account that was
/// left with zero lamports removes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
	pub lamports: u64,
	pub data: Vec<u8>,
	/// The program allowed to modify `data` and debit `lamports`.
	pub owner: Address,
	pub executable: bool,
}

impl Default for Account {
	fn default() -> Self {
		Self {
			lamports: 0,
			data: Vec::new(),
			owner: system::ID,
			executable: false,
		}
	}
}

impl Account {
	pub fn new(lamports: u64, space: usize, owner: &Address) -> Self {
		Self {
			lamports,
			data: vec![0; space],
			owner: *owner,
			executable: false,
		}
	}

	pub(crate) fn builtin_program() -> Self {
		Self {
			lamports: 1,
			data: Vec::new(),
			owner: native_loader::ID,
			executable: true,
		}
	}

	/// True when the account does not exist yet (or no longer exists).
	pub fn is_empty(&self) -> bool {
		self.lamports == 0 && self.data.is_empty()
	}

	pub fn data_is_zeroed(&self) -> bool {
		self.data.iter().all(|byte| *byte == 0)
	}
}

/// A reference to an account from an instruction, with the privileges the
/// instruction requests for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountMeta {
	pub address: Address,
	pub is_signer: bool,
	pub is_writable: bool,
}

impl AccountMeta {
	/// A writable account reference.
	pub const fn new(address: Address, is_signer: bool) -> Self {
		Self {
			address,
			is_signer,
			is_writable: true,
		}
	}

	pub const fn new_readonly(address: Address, is_signer: bool) -> Self {
		Self {
			address,
			is_signer,
			is_writable: false,
		}
	}
}

/// Merge duplicate references, keeping the strongest privileges of each.
pub(crate) fn merge_metas(metas: &[AccountMeta]) -> Vec<AccountMeta> {
	let mut merged: Vec<AccountMeta> = Vec::with_capacity(metas.len());

	for meta in metas {
		if let Some(existing) = merged.iter_mut().find(|m| m.address == meta.address) {
			existing.is_signer |= meta.is_signer;
			existing.is_writable |= meta.is_writable;
		} else {
			merged.push(*meta);
		}
	}

	merged
}

/// A call into a single program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
	pub program_id: Address,
	pub accounts: Vec<AccountMeta>,
	pub data: Vec<u8>,
}

impl Instruction {
	pub fn new(program_id: Address, accounts: Vec<AccountMeta>, data: Vec<u8>) -> Self {
		Self {
			program_id,
			accounts,
			data,
		}
	}
}

/// An ordered list of instructions that either all apply or none do.
///
/// `signers` lists the identities that authorised the transaction. Producing
/// and checking signatures happens before a transaction reaches the ledger,
/// so the set is trusted as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
	pub instructions: Vec<Instruction>,
	pub signers: Vec<Address>,
}

impl Transaction {
	pub fn new(instructions: impl Into<Vec<Instruction>>, signers: &[Address]) -> Self {
		Self {
			instructions: instructions.into(),
			signers: signers.to_vec(),
		}
	}

	pub fn is_signer(&self, address: &Address) -> bool {
		self.signers.contains(address)
	}

	/// Every account the transaction touches, including the programs it
	/// calls, with the strongest requested write privilege.
	pub fn account_keys(&self) -> Vec<(Address, bool)> {
		let mut keys: Vec<(Address, bool)> = Vec::new();
		let mut add = |address: Address, writable: bool| {
			if let Some(existing) = keys.iter_mut().find(|(key, _)| *key == address) {
				existing.1 |= writable;
			} else {
				keys.push((address, writable));
			}
		};

		for instruction in &self.instructions {
			add(instruction.program_id, false);
			for meta in &instruction.accounts {
				add(meta.address, meta.is_writable);
			}
		}

		keys
	}
}
