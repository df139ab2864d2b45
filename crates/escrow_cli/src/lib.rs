//! Library side of the `escrow` command line client.
//!
//! Everything here can be computed without access to a ledger: offer and
//! custody addresses, dispatch identifiers and instruction payloads. The
//! [`demo`] module additionally runs a complete offer lifecycle against a
//! fresh in-process ledger.

pub mod demo;
pub mod error;

use std::fmt::Write as _;
use std::str::FromStr;

use escrow_program::discriminator;
use escrow_program::instruction::EscrowInstruction;
use escrow_program::pda;
use serde::Serialize;
use swap_ledger::Address;

pub use crate::demo::DemoReport;
pub use crate::demo::run_demo;
pub use crate::error::CliError;

/// A derived address and, for program derived addresses, its bump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedAddress {
	pub address: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub bump: Option<u8>,
}

/// A dispatch identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discriminator {
	pub preimage: String,
	pub bytes: [u8; discriminator::DISCRIMINATOR_LEN],
	pub hex: String,
}

/// An encoded instruction payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedPayload {
	pub len: usize,
	pub hex: String,
}

/// Which namespace a discriminator is computed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscriminatorKind {
	Instruction,
	Account,
}

pub fn parse_address(value: &str) -> Result<Address, CliError> {
	Address::from_str(value).map_err(|_| {
		CliError::InvalidAddress {
			value: value.to_owned(),
		}
	})
}

/// Derive the offer record address of `(maker, id)`.
pub fn derive_offer(maker: &str, id: u64) -> Result<DerivedAddress, CliError> {
	let maker = parse_address(maker)?;
	let (address, bump) =
		pda::try_find_offer_address(&maker, id).ok_or(CliError::NoDerivation { what: "offer record" })?;

	Ok(DerivedAddress {
		address: address.to_string(),
		bump: Some(bump),
	})
}

/// Derive the custody account of `offer` for the asset kind `mint`.
pub fn derive_custody(offer: &str, mint: &str) -> Result<DerivedAddress, CliError> {
	let offer = parse_address(offer)?;
	let mint = parse_address(mint)?;
	let (address, bump) = pda::try_find_custody_address(&offer, &mint).ok_or(CliError::NoDerivation {
		what: "custody account",
	})?;

	Ok(DerivedAddress {
		address: address.to_string(),
		bump: Some(bump),
	})
}

pub fn compute_discriminator(name: &str, kind: DiscriminatorKind) -> Discriminator {
	let (preimage, bytes) = match kind {
		DiscriminatorKind::Instruction => {
			(format!("global:{name}"), discriminator::instruction_discriminator(name))
		}
		DiscriminatorKind::Account => {
			(format!("account:{name}"), discriminator::account_discriminator(name))
		}
	};

	Discriminator {
		preimage,
		bytes,
		hex: to_hex(&bytes),
	}
}

/// Encode a `MakeOffer` payload.
pub fn encode_make_offer(id: u64, offered_amount_a: u64, wanted_amount_b: u64) -> EncodedPayload {
	let data = EscrowInstruction::MakeOffer {
		id,
		offered_amount_a,
		wanted_amount_b,
	}
	.pack();

	EncodedPayload {
		len: data.len(),
		hex: to_hex(&data),
	}
}

/// Lowercase hexadecimal without a prefix.
pub fn to_hex(bytes: &[u8]) -> String {
	bytes
		.iter()
		.fold(String::with_capacity(bytes.len() * 2), |mut out, byte| {
			let _ = write!(out, "{byte:02x}");
			out
		})
}
