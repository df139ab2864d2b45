use num_enum::IntoPrimitive;
use num_enum::TryFromPrimitive;
use swap_ledger::ProgramError;
use swap_ledger::TransactionError;
use swap_ledger::system::SystemError;
use swap_ledger::token::TokenError;

/// Failures specific to the escrow program, reported as
/// [`ProgramError::Custom`] codes from 6000 upward.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive, thiserror::Error,
)]
#[repr(u32)]
pub enum EscrowError {
	#[error("asset account is not owned by the expected authority")]
	TokenOwnerMismatch = 6000,
	#[error("asset account holds a different asset kind")]
	TokenMintMismatch = 6001,
	#[error("offer record address does not match its derivation")]
	OfferAddressMismatch = 6002,
	#[error("custody account address does not match its derivation")]
	CustodyAddressMismatch = 6003,
	#[error("destination is not the associated account of its owner")]
	AssociatedAccountMismatch = 6004,
	#[error("maker does not match the offer record")]
	MakerMismatch = 6005,
	#[error("asset kind does not match the offer record")]
	AssetKindMismatch = 6006,
	#[error("both sides of an offer must be different asset kinds")]
	IdenticalAssetKinds = 6007,
	#[error("offered amount must be greater than zero")]
	InvalidOfferedAmount = 6008,
}

impl From<EscrowError> for ProgramError {
	fn from(error: EscrowError) -> Self {
		ProgramError::Custom(error.into())
	}
}

/// Why a submitted transaction had no effect, from a caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
	/// A supplied account is not controlled by the identity that must
	/// authorise it.
	#[error("ownership or constraint violation")]
	OwnershipConstraint,
	/// A source account cannot cover a required transfer.
	#[error("insufficient balance")]
	InsufficientBalance,
	/// The offer record address is already occupied; choose another id.
	#[error("offer already exists")]
	AlreadyExists,
	/// A supplied address differs from its derivation.
	#[error("address mismatch")]
	AddressMismatch,
	/// The offer no longer exists, usually because it was already taken.
	#[error("offer not found")]
	NotFound,
	/// The request itself is invalid.
	#[error("invalid input")]
	InvalidInput,
	/// One of the accounts was held when locks were requested without
	/// waiting.
	#[error("accounts in use by another transaction")]
	Contended,
	/// Any other failure.
	#[error("malformed transaction")]
	Malformed,
}

impl Rejection {
	pub fn classify(error: &TransactionError) -> Self {
		match error {
			TransactionError::AccountInUse(_) => Self::Contended,
			TransactionError::MissingSignature(_) => Self::OwnershipConstraint,
			TransactionError::InsufficientFundsForRent(_) => Self::InsufficientBalance,
			TransactionError::TooManyAccountLocks => Self::Malformed,
			TransactionError::InstructionError { error, .. } => Self::from_program_error(error),
		}
	}

	pub fn from_program_error(error: &ProgramError) -> Self {
		match error {
			ProgramError::Custom(code) => {
				match EscrowError::try_from(*code) {
					Ok(EscrowError::TokenOwnerMismatch | EscrowError::TokenMintMismatch) => {
						Self::OwnershipConstraint
					}
					Ok(
						EscrowError::OfferAddressMismatch
						| EscrowError::CustodyAddressMismatch
						| EscrowError::AssociatedAccountMismatch
						| EscrowError::MakerMismatch
						| EscrowError::AssetKindMismatch,
					) => Self::AddressMismatch,
					Ok(EscrowError::IdenticalAssetKinds | EscrowError::InvalidOfferedAmount) => {
						Self::InvalidInput
					}
					Err(_) => Self::Malformed,
				}
			}
			ProgramError::Token(TokenError::InsufficientFunds)
			| ProgramError::System(SystemError::ResultWithNegativeLamports)
			| ProgramError::InsufficientFunds => Self::InsufficientBalance,
			ProgramError::Token(TokenError::OwnerMismatch | TokenError::MintMismatch)
			| ProgramError::MissingRequiredSignature
			| ProgramError::IllegalOwner => Self::OwnershipConstraint,
			ProgramError::AccountAlreadyInitialized
			| ProgramError::System(SystemError::AccountAlreadyInUse)
			| ProgramError::Token(TokenError::AlreadyInUse) => Self::AlreadyExists,
			ProgramError::InvalidSeeds => Self::AddressMismatch,
			ProgramError::UninitializedAccount
			| ProgramError::Token(TokenError::UninitializedState)
			| ProgramError::MissingAccount => Self::NotFound,
			ProgramError::InvalidArgument
			| ProgramError::InvalidInstructionData
			| ProgramError::InvalidAccountData
			| ProgramError::NotEnoughAccountKeys
			| ProgramError::IncorrectProgramId
			| ProgramError::Token(TokenError::InvalidInstruction | TokenError::MintDecimalsMismatch) => {
				Self::InvalidInput
			}
			_ => Self::Malformed,
		}
	}

	/// Whether resubmitting the same transaction unchanged may succeed.
	///
	/// Only lock contention is transient. In particular an offer that is not
	/// found has already been settled and will never reappear.
	pub fn is_retryable(self) -> bool {
		matches!(self, Self::Contended)
	}
}
