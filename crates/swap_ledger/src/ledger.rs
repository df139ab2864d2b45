use std::collections::HashMap;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use typed_builder::TypedBuilder;

use crate::Account;
use crate::AccountLockGuard;
use crate::Address;
use crate::InvokeContext;
use crate::Program;
use crate::Transaction;
use crate::TransactionError;
use crate::TransactionFailure;
use crate::associated_token::AssociatedTokenProgram;
use crate::invoke::ProgramRegistry;
use crate::locks::LockTable;
use crate::rent::Rent;
use crate::system::SystemProgram;
use crate::token;
use crate::token::TokenProgram;
use crate::token::state::Mint;
use crate::token::state::TokenAccount;

/// Maximum height of the invocation stack, counting the top-level
/// instruction.
pub const DEFAULT_MAX_INVOKE_DEPTH: usize = 5;
pub const DEFAULT_MAX_TRANSACTION_ACCOUNTS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
pub struct LedgerConfig {
	#[builder(default)]
	pub rent: Rent,
	#[builder(default = DEFAULT_MAX_INVOKE_DEPTH)]
	pub max_invoke_depth: usize,
	#[builder(default = DEFAULT_MAX_TRANSACTION_ACCOUNTS)]
	pub max_transaction_accounts: usize,
}

impl Default for LedgerConfig {
	fn default() -> Self {
		Self::builder().build()
	}
}

/// What a committed transaction leaves behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionReceipt {
	pub logs: Vec<String>,
}

/// The account store and transaction processor.
///
/// `Ledger` is `Sync`: share it behind an [`Arc`] once every program has been
/// registered and submit transactions from any number of threads.
/// Transactions that touch disjoint accounts run in parallel; a transaction
/// that needs an account another transaction holds waits until it is
/// released, so conflicting transactions run one at a time.
pub struct Ledger {
	config: LedgerConfig,
	accounts: RwLock<HashMap<Address, Account>>,
	locks: LockTable,
	programs: ProgramRegistry,
}

impl Default for Ledger {
	fn default() -> Self {
		Self::new(LedgerConfig::default())
	}
}

impl Ledger {
	/// Create a ledger with the builtin programs installed.
	pub fn new(config: LedgerConfig) -> Self {
		let mut ledger = Self {
			config,
			accounts: RwLock::new(HashMap::new()),
			locks: LockTable::default(),
			programs: HashMap::new(),
		};

		ledger.register(Arc::new(SystemProgram));
		ledger.register(Arc::new(TokenProgram));
		ledger.register(Arc::new(AssociatedTokenProgram));

		ledger
	}

	/// Install a program under its own id, replacing any program already
	/// registered there.
	pub fn register(&mut self, program: Arc<dyn Program>) {
		let id = program.id();
		self.accounts
			.get_mut()
			.unwrap_or_else(PoisonError::into_inner)
			.insert(id, Account::builtin_program());
		self.programs.insert(id, program);
	}

	pub fn config(&self) -> &LedgerConfig {
		&self.config
	}

	/// A snapshot of the committed state of `address`.
	pub fn get_account(&self, address: &Address) -> Option<Account> {
		self.accounts
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.get(address)
			.cloned()
	}

	pub fn balance(&self, address: &Address) -> u64 {
		self.get_account(address)
			.map_or(0, |account| account.lamports)
	}

	/// The committed asset account at `address`, if one exists.
	pub fn token_account(&self, address: &Address) -> Option<TokenAccount> {
		let account = self.get_account(address)?;
		if account.owner != token::ID {
			return None;
		}

		TokenAccount::unpack(&account.data).ok().copied()
	}

	/// The committed asset mint at `address`, if one exists.
	pub fn mint(&self, address: &Address) -> Option<Mint> {
		let account = self.get_account(address)?;
		if account.owner != token::ID {
			return None;
		}

		Mint::unpack(&account.data).ok().copied()
	}

	/// Overwrite the committed state of `address`.
	///
	/// Intended for seeding fixtures. Waits for any transaction holding the
	/// account.
	pub fn set_account(&self, address: Address, account: Account) {
		let _guard = AccountLockGuard::acquire(&self.locks, vec![(address, true)]);
		let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);

		if account.is_empty() {
			accounts.remove(&address);
		} else {
			accounts.insert(address, account);
		}
	}

	/// Credit `lamports` to `address`, creating a system account if needed.
	pub fn airdrop(&self, address: &Address, lamports: u64) {
		let _guard = AccountLockGuard::acquire(&self.locks, vec![(*address, true)]);
		let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
		let account = accounts.entry(*address).or_default();
		account.lamports = account.lamports.saturating_add(lamports);
	}

	/// Take the locks `transaction` would need without executing it, failing
	/// with [`TransactionError::AccountInUse`] instead of waiting when one of
	/// them is held.
	///
	/// While the returned guard is alive every conflicting transaction waits.
	/// Submitting one from the thread holding the guard never returns.
	pub fn lock_accounts(
		&self,
		transaction: &Transaction,
	) -> Result<AccountLockGuard<'_>, TransactionError> {
		AccountLockGuard::try_acquire(&self.locks, transaction.account_keys())
	}

	/// Execute `transaction` as one unit of work.
	///
	/// Either every instruction succeeds and every staged change is committed,
	/// or the transaction fails and the committed state is left untouched.
	/// The logs collected up to the failure are returned with the error.
	pub fn process_transaction(
		&self,
		transaction: &Transaction,
	) -> Result<TransactionReceipt, TransactionFailure> {
		let keys = transaction.account_keys();
		if keys.len() > self.config.max_transaction_accounts {
			return Err(TransactionError::TooManyAccountLocks.into());
		}

		for instruction in &transaction.instructions {
			for meta in &instruction.accounts {
				if meta.is_signer && !transaction.is_signer(&meta.address) {
					return Err(TransactionError::MissingSignature(meta.address).into());
				}
			}
		}

		let guard = AccountLockGuard::acquire(&self.locks, keys);

		let loaded = {
			let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
			guard
				.keys()
				.iter()
				.map(|(address, _)| (*address, accounts.get(address).cloned().unwrap_or_default()))
				.collect::<HashMap<_, _>>()
		};

		let mut ctx = InvokeContext::new(loaded, &self.programs, &self.config);

		for (index, instruction) in transaction.instructions.iter().enumerate() {
			if let Err(error) = ctx.process_instruction(instruction) {
				let (_, logs) = ctx.into_parts();
				let index = u8::try_from(index).unwrap_or(u8::MAX);
				return Err(TransactionFailure::new(
					TransactionError::InstructionError { index, error },
					logs,
				));
			}
		}

		let (mut staged, logs) = ctx.into_parts();

		for (address, writable) in guard.keys() {
			if !writable {
				continue;
			}

			let Some(account) = staged.get(address) else {
				continue;
			};

			let below_deposit = account.lamports > 0
				&& !account.data.is_empty()
				&& !self.config.rent.is_exempt(account.lamports, account.data.len());
			if below_deposit {
				return Err(TransactionFailure::new(
					TransactionError::InsufficientFundsForRent(*address),
					logs,
				));
			}
		}

		let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
		for (address, writable) in guard.keys() {
			if !writable {
				continue;
			}

			match staged.remove(address) {
				Some(account) if account.lamports == 0 => {
					accounts.remove(address);
				}
				Some(account) => {
					accounts.insert(*address, account);
				}
				None => {}
			}
		}
		drop(accounts);

		Ok(TransactionReceipt { logs })
	}
}
