use swap_ledger::TransactionFailure;

/// Errors produced by the `escrow` command line client.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
	#[error("Invalid address `{value}`: expected a base58 encoded 32 byte address")]
	InvalidAddress { value: String },

	#[error("No valid derivation exists for the {what}")]
	NoDerivation { what: &'static str },

	#[error("Demo step `{step}` failed: {source}")]
	Demo {
		step: &'static str,
		source: TransactionFailure,
	},

	#[error("Failed to serialize output: {0}")]
	Json(#[from] serde_json::Error),
}

impl CliError {
	pub fn demo(step: &'static str, source: TransactionFailure) -> Self {
		Self::Demo { step, source }
	}
}
