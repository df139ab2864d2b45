use crate::Address;
use crate::system::SystemError;
use crate::token::TokenError;

/// Result type returned by program handlers.
pub type ProgramResult = Result<(), ProgramError>;

/// Reasons an instruction can fail.
///
/// Builtin programs report their own failures through the [`System`] and
/// [`Token`] variants. Any other program reports domain failures through
/// [`Custom`] codes.
///
/// [`System`]: ProgramError::System
/// [`Token`]: ProgramError::Token
/// [`Custom`]: ProgramError::Custom
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProgramError {
	#[error("custom program error: {0:#x}")]
	Custom(u32),
	#[error("system program error: {0}")]
	System(#[from] SystemError),
	#[error("token program error: {0}")]
	Token(#[from] TokenError),
	#[error("invalid program argument")]
	InvalidArgument,
	#[error("invalid instruction data")]
	InvalidInstructionData,
	#[error("invalid account data for instruction")]
	InvalidAccountData,
	#[error("account data too small for instruction")]
	AccountDataTooSmall,
	#[error("insufficient funds for instruction")]
	InsufficientFunds,
	#[error("incorrect program id for instruction")]
	IncorrectProgramId,
	#[error("missing required signature for instruction")]
	MissingRequiredSignature,
	#[error("instruction requires an uninitialized account")]
	AccountAlreadyInitialized,
	#[error("instruction requires an initialized account")]
	UninitializedAccount,
	#[error("insufficient account keys for instruction")]
	NotEnoughAccountKeys,
	#[error("provided seeds do not result in a valid address")]
	InvalidSeeds,
	#[error("provided owner is not allowed")]
	IllegalOwner,
	#[error("arithmetic overflowed")]
	ArithmeticOverflow,
	#[error("an account required by the instruction is missing")]
	MissingAccount,
	#[error("cross-program invocation with unauthorized signer or writable account")]
	PrivilegeEscalation,
	#[error("unsupported program id")]
	UnsupportedProgramId,
	#[error("cross-program invocation call depth too deep")]
	CallDepth,
	#[error("cross-program invocation reentrancy not allowed for this instruction")]
	ReentrancyNotAllowed,
	#[error("instruction modified data of an account it does not own")]
	ExternalAccountDataModified,
	#[error("instruction spent from the balance of an account it does not own")]
	ExternalAccountLamportSpend,
	#[error("instruction modified data of a read-only account")]
	ReadonlyDataModified,
	#[error("instruction changed the balance of a read-only account")]
	ReadonlyLamportChange,
	#[error("instruction illegally modified the program id of an account")]
	ModifiedProgramId,
	#[error("instruction changed the executable flag of an account")]
	ExecutableModified,
	#[error("sum of account balances before and after instruction do not match")]
	UnbalancedInstruction,
}

/// Reasons a whole transaction can be rejected.
///
/// Every variant means the transaction had no observable effect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
	/// Another holder has a conflicting lock. Only reported when locks are
	/// taken without waiting ([`Ledger::lock_accounts`]); it is the only
	/// transient failure.
	///
	/// [`Ledger::lock_accounts`]: crate::Ledger::lock_accounts
	#[error("account {0} is in use by another transaction")]
	AccountInUse(Address),
	#[error("transaction locks too many accounts")]
	TooManyAccountLocks,
	#[error("account {0} is marked as a signer but did not sign the transaction")]
	MissingSignature(Address),
	#[error("instruction {index} failed: {error}")]
	InstructionError { index: u8, error: ProgramError },
	#[error("account {0} would hold less than its reserved deposit")]
	InsufficientFundsForRent(Address),
}

impl TransactionError {
	/// The program error behind an instruction failure, if any.
	pub fn program_error(&self) -> Option<ProgramError> {
		match self {
			Self::InstructionError { error, .. } => Some(*error),
			_ => None,
		}
	}
}

/// A rejected transaction together with the logs it produced before failing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{error}")]
pub struct TransactionFailure {
	pub error: TransactionError,
	pub logs: Vec<String>,
}

impl TransactionFailure {
	pub fn new(error: TransactionError, logs: Vec<String>) -> Self {
		Self { error, logs }
	}
}

impl From<TransactionError> for TransactionFailure {
	fn from(error: TransactionError) -> Self {
		Self::new(error, Vec::new())
	}
}
