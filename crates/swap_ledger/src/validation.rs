use crate::Account;
use crate::AccountMeta;
use crate::Address;
use crate::ProgramError;
use crate::log;
use crate::token;
use crate::token::TokenError;
use crate::token::state::Mint;
use crate::token::state::TokenAccount;

/// An instruction's reference to an account paired with the account's staged
/// state.
#[derive(Debug, Clone, Copy)]
pub struct AccountView<'a> {
	meta: &'a AccountMeta,
	account: &'a Account,
}

impl<'a> AccountView<'a> {
	pub(crate) fn new(meta: &'a AccountMeta, account: &'a Account) -> Self {
		Self { meta, account }
	}

	pub fn address(&self) -> &'a Address {
		&self.meta.address
	}

	pub fn meta(&self) -> &'a AccountMeta {
		self.meta
	}

	pub fn account(&self) -> &'a Account {
		self.account
	}

	pub fn data(&self) -> &'a [u8] {
		&self.account.data
	}

	pub fn lamports(&self) -> u64 {
		self.account.lamports
	}

	/// Interpret the account as an initialised asset mint.
	pub fn as_mint(&self) -> Result<&'a Mint, ProgramError> {
		self.assert_token_owned()?;
		Mint::unpack(&self.account.data)
	}

	/// Interpret the account as an initialised asset account.
	pub fn as_token_account(&self) -> Result<&'a TokenAccount, ProgramError> {
		self.assert_token_owned()?;
		TokenAccount::unpack(&self.account.data)
	}

	fn assert_token_owned(&self) -> Result<(), ProgramError> {
		if self.account.is_empty() {
			log!("address: {} does not exist", self.address().as_ref());
			return Err(TokenError::UninitializedState.into());
		}

		if self.account.owner != token::ID {
			log!(
				"address: {} is not owned by the token program",
				self.address().as_ref()
			);
			return Err(ProgramError::IllegalOwner);
		}

		Ok(())
	}
}

/// Validation chain for account references.
///
/// Methods return `Result<&Self, ProgramError>` to enable chaining:
/// ```ignore
/// ctx.view(maker)?.assert_signer()?.assert_writable()?;
/// ```
pub trait AccountInfoValidation {
	/// Assert that the account signed the instruction.
	fn assert_signer(&self) -> Result<&Self, ProgramError>;
	/// Assert that the account was passed as writable.
	fn assert_writable(&self) -> Result<&Self, ProgramError>;
	/// Assert that the account is a program.
	fn assert_executable(&self) -> Result<&Self, ProgramError>;
	/// Assert that the account does not exist yet.
	fn assert_empty(&self) -> Result<&Self, ProgramError>;
	/// Assert that the account exists.
	fn assert_not_empty(&self) -> Result<&Self, ProgramError>;
	/// Assert that the account is owned by `owner`.
	fn assert_owner(&self, owner: &Address) -> Result<&Self, ProgramError>;
	/// Assert that the account is the program `program_id`.
	fn assert_program(&self, program_id: &Address) -> Result<&Self, ProgramError>;
}

impl AccountInfoValidation for AccountView<'_> {
	#[track_caller]
	fn assert_signer(&self) -> Result<&Self, ProgramError> {
		if !self.meta.is_signer {
			log!(
				"address: {} is missing a required signature",
				self.address().as_ref()
			);
			return Err(ProgramError::MissingRequiredSignature);
		}

		Ok(self)
	}

	#[track_caller]
	fn assert_writable(&self) -> Result<&Self, ProgramError> {
		if !self.meta.is_writable {
			log!(
				"address: {} has not been marked as writable",
				self.address().as_ref()
			);
			return Err(ProgramError::InvalidAccountData);
		}

		Ok(self)
	}

	#[track_caller]
	fn assert_executable(&self) -> Result<&Self, ProgramError> {
		if !self.account.executable {
			log!("address: {} is not executable", self.address().as_ref());
			return Err(ProgramError::IncorrectProgramId);
		}

		Ok(self)
	}

	#[track_caller]
	fn assert_empty(&self) -> Result<&Self, ProgramError> {
		if !self.account.is_empty() {
			log!("address: {} is already in use", self.address().as_ref());
			return Err(ProgramError::AccountAlreadyInitialized);
		}

		Ok(self)
	}

	#[track_caller]
	fn assert_not_empty(&self) -> Result<&Self, ProgramError> {
		if self.account.is_empty() {
			log!("address: {} does not exist", self.address().as_ref());
			return Err(ProgramError::UninitializedAccount);
		}

		Ok(self)
	}

	#[track_caller]
	fn assert_owner(&self, owner: &Address) -> Result<&Self, ProgramError> {
		if self.account.owner != *owner {
			log!("address: {} has an unexpected owner", self.address().as_ref());
			return Err(ProgramError::IllegalOwner);
		}

		Ok(self)
	}

	#[track_caller]
	fn assert_program(&self, program_id: &Address) -> Result<&Self, ProgramError> {
		if self.address() != program_id {
			log!("address: {} is not the expected program", self.address().as_ref());
			return Err(ProgramError::IncorrectProgramId);
		}

		self.assert_executable()
	}
}
