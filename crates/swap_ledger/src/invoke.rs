use std::collections::HashMap;
use std::sync::Arc;

use crate::Account;
use crate::AccountMeta;
use crate::AccountView;
use crate::Address;
use crate::Instruction;
use crate::LedgerConfig;
use crate::ProgramError;
use crate::ProgramResult;
use crate::account::merge_metas;
use crate::rent::Rent;
use crate::system;

/// A program that can be installed in the ledger.
///
/// Handlers receive the instruction's account references and payload and
/// operate on the transaction's staging buffer through the [`InvokeContext`].
/// Nothing a handler does is visible outside the transaction until the whole
/// transaction succeeds.
pub trait Program: Send + Sync {
	fn id(&self) -> Address;

	fn process(
		&self,
		ctx: &mut InvokeContext<'_>,
		accounts: &[AccountMeta],
		data: &[u8],
	) -> ProgramResult;
}

pub(crate) type ProgramRegistry = HashMap<Address, Arc<dyn Program>>;

/// One entry of the invocation stack.
struct Frame {
	program_id: Address,
	accounts: Vec<AccountMeta>,
	/// Account states at the last verification point, aligned with
	/// `accounts`.
	pre: Vec<Account>,
}

/// The unit-of-work of a single transaction.
///
/// Holds the staged copies of every account the transaction references, the
/// invocation stack and the log collector. Dropping it discards every staged
/// change.
pub struct InvokeContext<'a> {
	accounts: HashMap<Address, Account>,
	programs: &'a ProgramRegistry,
	config: &'a LedgerConfig,
	stack: Vec<Frame>,
	logs: Vec<String>,
	/// First failure of a nested call in the current top-level instruction.
	/// It fails the instruction even if the caller carries on.
	nested_failure: Option<ProgramError>,
}

impl<'a> InvokeContext<'a> {
	pub(crate) fn new(
		accounts: HashMap<Address, Account>,
		programs: &'a ProgramRegistry,
		config: &'a LedgerConfig,
	) -> Self {
		Self {
			accounts,
			programs,
			config,
			stack: Vec::new(),
			logs: Vec::new(),
			nested_failure: None,
		}
	}

	pub(crate) fn into_parts(self) -> (HashMap<Address, Account>, Vec<String>) {
		(self.accounts, self.logs)
	}

	/// The program currently executing.
	pub fn program_id(&self) -> Result<Address, ProgramError> {
		self.stack
			.last()
			.map(|frame| frame.program_id)
			.ok_or(ProgramError::UnsupportedProgramId)
	}

	pub fn rent(&self) -> Rent {
		self.config.rent
	}

	/// Whether the executing instruction was handed `address`.
	fn in_frame(&self, address: &Address) -> bool {
		self.stack
			.last()
			.is_none_or(|frame| frame.accounts.iter().any(|meta| meta.address == *address))
	}

	pub fn account(&self, address: &Address) -> Result<&Account, ProgramError> {
		if !self.in_frame(address) {
			return Err(ProgramError::MissingAccount);
		}

		self.accounts.get(address).ok_or(ProgramError::MissingAccount)
	}

	/// Mutable access to a staged account.
	///
	/// Whether the change is allowed is checked when the current instruction
	/// returns (or invokes another program): only the owning program may
	/// change data, debit lamports or hand the account to a new owner.
	pub fn account_mut(&mut self, address: &Address) -> Result<&mut Account, ProgramError> {
		if !self.in_frame(address) {
			return Err(ProgramError::MissingAccount);
		}

		self.accounts
			.get_mut(address)
			.ok_or(ProgramError::MissingAccount)
	}

	/// Pair an account reference with its staged state for validation.
	pub fn view<'b>(&'b self, meta: &'b AccountMeta) -> Result<AccountView<'b>, ProgramError> {
		Ok(AccountView::new(meta, self.account(&meta.address)?))
	}

	pub fn log(&mut self, message: impl Into<String>) {
		self.logs.push(message.into());
	}

	/// Close a program-owned account: move all of its lamports to
	/// `recipient`, clear its data and return it to the system program.
	pub fn close_account(&mut self, address: &Address, recipient: &Address) -> ProgramResult {
		if address == recipient {
			return Err(ProgramError::InvalidArgument);
		}

		let lamports = self.account(address)?.lamports;
		let recipient_balance = self
			.account(recipient)?
			.lamports
			.checked_add(lamports)
			.ok_or(ProgramError::ArithmeticOverflow)?;

		self.account_mut(recipient)?.lamports = recipient_balance;
		let account = self.account_mut(address)?;
		account.lamports = 0;
		account.data.clear();
		account.owner = system::ID;

		Ok(())
	}

	/// Call another program with the current program's privileges.
	pub fn invoke(&mut self, instruction: &Instruction) -> ProgramResult {
		self.invoke_signed(instruction, &[])
	}

	/// Call another program, additionally signing for every address derived
	/// from `signers_seeds` and the *current* program's id.
	///
	/// This is the only way an account without a private key (an address
	/// derived from a program) can authorise anything, and only the program
	/// it was derived from can produce the signature.
	pub fn invoke_signed(
		&mut self,
		instruction: &Instruction,
		signers_seeds: &[&[&[u8]]],
	) -> ProgramResult {
		let caller = self.program_id()?;
		let result = signers_seeds
			.iter()
			.map(|seeds| {
				Address::create_program_address(seeds, &caller)
					.map_err(|_| ProgramError::InvalidSeeds)
			})
			.collect::<Result<Vec<_>, _>>()
			.and_then(|derived_signers| self.execute(instruction, &derived_signers));

		if let (Err(error), None) = (result, self.nested_failure) {
			self.nested_failure = Some(error);
		}

		result
	}

	/// Execute a top-level instruction of the transaction.
	///
	/// A nested call that failed fails the instruction, whatever its caller
	/// did with the error: the callee's staged changes are never checked
	/// again once it has returned.
	pub(crate) fn process_instruction(&mut self, instruction: &Instruction) -> ProgramResult {
		debug_assert!(self.stack.is_empty());
		self.nested_failure = None;

		let result = self.execute(instruction, &[]);
		match self.nested_failure.take() {
			Some(error) if result.is_ok() => Err(error),
			_ => result,
		}
	}

	fn execute(&mut self, instruction: &Instruction, derived_signers: &[Address]) -> ProgramResult {
		let depth = self.stack.len();
		if depth >= self.config.max_invoke_depth {
			return Err(ProgramError::CallDepth);
		}

		let accounts = merge_metas(&instruction.accounts);

		if let Some(caller) = self.stack.last() {
			check_privileges(caller, instruction, &accounts, derived_signers)?;

			let reentrant = caller.program_id != instruction.program_id
				&& self
					.stack
					.iter()
					.any(|frame| frame.program_id == instruction.program_id);
			if reentrant {
				return Err(ProgramError::ReentrancyNotAllowed);
			}

			self.verify(caller)?;
		}

		let programs = self.programs;
		let program = programs
			.get(&instruction.program_id)
			.ok_or(ProgramError::UnsupportedProgramId)?;

		let pre = accounts
			.iter()
			.map(|meta| self.account(&meta.address).cloned())
			.collect::<Result<Vec<_>, _>>()?;

		self.logs.push(format!(
			"Program {} invoke [{}]",
			instruction.program_id,
			depth + 1
		));
		self.stack.push(Frame {
			program_id: instruction.program_id,
			accounts,
			pre,
		});

		let result = program
			.process(self, &instruction.accounts, &instruction.data)
			.and_then(|()| {
				let frame = self.stack.last().ok_or(ProgramError::UnsupportedProgramId)?;
				self.verify(frame)
			});

		self.stack.pop();
		self.refresh_caller();

		match &result {
			Ok(()) => {
				self.logs
					.push(format!("Program {} success", instruction.program_id));
			}
			Err(error) => {
				self.logs.push(format!(
					"Program {} failed: {error}",
					instruction.program_id
				));
			}
		}

		result
	}

	/// Check the changes made under `frame` since its last verification point.
	fn verify(&self, frame: &Frame) -> ProgramResult {
		let mut before_total: u128 = 0;
		let mut after_total: u128 = 0;

		for (meta, before) in frame.accounts.iter().zip(&frame.pre) {
			let after = self.account(&meta.address)?;
			before_total += u128::from(before.lamports);
			after_total += u128::from(after.lamports);

			verify_account(&frame.program_id, meta, before, after)?;
		}

		if before_total != after_total {
			return Err(ProgramError::UnbalancedInstruction);
		}

		Ok(())
	}

	/// After a nested call returns, the caller's verification point moves to
	/// the current state: the callee has already been held to its own rules.
	fn refresh_caller(&mut self) {
		let accounts = &self.accounts;
		if let Some(caller) = self.stack.last_mut() {
			for (meta, pre) in caller.accounts.iter().zip(caller.pre.iter_mut()) {
				if let Some(current) = accounts.get(&meta.address) {
					pre.clone_from(current);
				}
			}
		}
	}
}

fn check_privileges(
	caller: &Frame,
	instruction: &Instruction,
	accounts: &[AccountMeta],
	derived_signers: &[Address],
) -> ProgramResult {
	let passed_program = caller
		.accounts
		.iter()
		.any(|meta| meta.address == instruction.program_id);
	if !passed_program {
		return Err(ProgramError::MissingAccount);
	}

	for meta in accounts {
		let caller_meta = caller
			.accounts
			.iter()
			.find(|m| m.address == meta.address)
			.ok_or(ProgramError::MissingAccount)?;

		if meta.is_writable && !caller_meta.is_writable {
			return Err(ProgramError::PrivilegeEscalation);
		}

		let signed = caller_meta.is_signer || derived_signers.contains(&meta.address);
		if meta.is_signer && !signed {
			return Err(ProgramError::PrivilegeEscalation);
		}
	}

	Ok(())
}

fn verify_account(
	program_id: &Address,
	meta: &AccountMeta,
	before: &Account,
	after: &Account,
) -> ProgramResult {
	if after.executable != before.executable {
		return Err(ProgramError::ExecutableModified);
	}

	if !meta.is_writable {
		if after.lamports != before.lamports {
			return Err(ProgramError::ReadonlyLamportChange);
		}
		if after.data != before.data {
			return Err(ProgramError::ReadonlyDataModified);
		}
		if after.owner != before.owner {
			return Err(ProgramError::ModifiedProgramId);
		}
		return Ok(());
	}

	let owned = before.owner == *program_id;

	if after.owner != before.owner && (!owned || !after.data_is_zeroed()) {
		return Err(ProgramError::ModifiedProgramId);
	}
	if after.data != before.data && !owned {
		return Err(ProgramError::ExternalAccountDataModified);
	}
	if after.lamports < before.lamports && !owned {
		return Err(ProgramError::ExternalAccountLamportSpend);
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn address(byte: u8) -> Address {
		Address::new_from_array([byte; 32])
	}

	#[test]
	fn readonly_accounts_must_not_change() {
		let program = address(7);
		let meta = AccountMeta::new_readonly(address(1), false);
		let before = Account::new(10, 4, &program);
		let mut after = before.clone();
		after.lamports = 11;

		assert_eq!(
			verify_account(&program, &meta, &before, &after),
			Err(ProgramError::ReadonlyLamportChange)
		);
	}

	#[test]
	fn foreign_programs_cannot_debit_or_write() {
		let owner = address(7);
		let other = address(8);
		let meta = AccountMeta::new(address(1), false);
		let before = Account::new(10, 4, &owner);

		let mut debited = before.clone();
		debited.lamports = 9;
		assert_eq!(
			verify_account(&other, &meta, &before, &debited),
			Err(ProgramError::ExternalAccountLamportSpend)
		);

		let mut written = before.clone();
		written.data[0] = 1;
		assert_eq!(
			verify_account(&other, &meta, &before, &written),
			Err(ProgramError::ExternalAccountDataModified)
		);

		let mut credited = before.clone();
		credited.lamports = 11;
		assert_eq!(verify_account(&other, &meta, &before, &credited), Ok(()));
	}

	#[test]
	fn executable_flag_is_fixed() {
		let owner = address(7);
		let before = Account::new(10, 0, &owner);
		let mut flipped = before.clone();
		flipped.executable = true;

		for meta in [
			AccountMeta::new(address(1), false),
			AccountMeta::new_readonly(address(1), false),
		] {
			assert_eq!(
				verify_account(&owner, &meta, &before, &flipped),
				Err(ProgramError::ExecutableModified)
			);
		}
	}

	#[test]
	fn owner_may_only_reassign_zeroed_accounts() {
		let owner = address(7);
		let meta = AccountMeta::new(address(1), false);
		let before = Account::new(10, 4, &owner);

		let mut reassigned = before.clone();
		reassigned.owner = address(9);
		assert_eq!(verify_account(&owner, &meta, &before, &reassigned), Ok(()));

		reassigned.data[0] = 1;
		assert_eq!(
			verify_account(&owner, &meta, &before, &reassigned),
			Err(ProgramError::ModifiedProgramId)
		);
	}

	#[test]
	fn nested_calls_cannot_escalate_privileges() {
		let caller = Frame {
			program_id: address(7),
			accounts: vec![
				AccountMeta::new_readonly(address(1), false),
				AccountMeta::new(address(2), false),
				AccountMeta::new_readonly(address(8), false),
			],
			pre: Vec::new(),
		};

		let write_escalation = Instruction::new(
			address(8),
			vec![AccountMeta::new(address(1), false)],
			Vec::new(),
		);
		assert_eq!(
			check_privileges(
				&caller,
				&write_escalation,
				&write_escalation.accounts,
				&[]
			),
			Err(ProgramError::PrivilegeEscalation)
		);

		let sign_escalation = Instruction::new(
			address(8),
			vec![AccountMeta::new(address(2), true)],
			Vec::new(),
		);
		assert_eq!(
			check_privileges(&caller, &sign_escalation, &sign_escalation.accounts, &[]),
			Err(ProgramError::PrivilegeEscalation)
		);
		assert_eq!(
			check_privileges(
				&caller,
				&sign_escalation,
				&sign_escalation.accounts,
				&[address(2)]
			),
			Ok(())
		);

		let unknown_program = Instruction::new(address(9), Vec::new(), Vec::new());
		assert_eq!(
			check_privileges(&caller, &unknown_program, &[], &[]),
			Err(ProgramError::MissingAccount)
		);
	}
}
