//! A complete offer lifecycle against a fresh in-process ledger.
//!
//! The maker offers 1.000000 of asset A (6 decimals) for 2.000000 of asset B
//! (6 decimals) under id 1, then a taker settles the offer.

use std::fmt;
use std::sync::Arc;

use escrow_program::EscrowProgram;
use escrow_program::client::fetch_offer;
use escrow_program::client::token_balance;
use escrow_program::instruction;
use escrow_program::pda::find_custody_address;
use escrow_program::pda::find_offer_address;
use serde::Serialize;
use swap_ledger::Address;
use swap_ledger::Ledger;
use swap_ledger::Transaction;
use swap_ledger::associated_token;
use swap_ledger::system;
use swap_ledger::token;
use swap_ledger::token::state::Mint;

use crate::CliError;

const DECIMALS: u8 = 6;
const FAUCET: u64 = 10_000_000_000;
const OFFER_ID: u64 = 1;
const OFFERED_AMOUNT_A: u64 = 1_000_000;
const WANTED_AMOUNT_B: u64 = 2_000_000;

/// What the demo observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoReport {
	pub maker: String,
	pub taker: String,
	pub offer: String,
	pub custody: String,
	/// Custody balance right after the offer was made.
	pub custody_after_make: u64,
	pub taker_asset_a: u64,
	pub maker_asset_b: u64,
	/// Whether the offer record was gone after settlement.
	pub offer_closed: bool,
	/// Logs of the make and take transactions, in order.
	pub logs: Vec<String>,
}

impl fmt::Display for DemoReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "maker:   {}", self.maker)?;
		writeln!(f, "taker:   {}", self.taker)?;
		writeln!(f, "offer:   {}", self.offer)?;
		writeln!(f, "custody: {}", self.custody)?;
		writeln!(f)?;
		for line in &self.logs {
			writeln!(f, "  {line}")?;
		}
		writeln!(f)?;
		writeln!(f, "custody after make: {}", self.custody_after_make)?;
		writeln!(f, "taker asset A:      {}", self.taker_asset_a)?;
		writeln!(f, "maker asset B:      {}", self.maker_asset_b)?;
		write!(f, "offer closed:       {}", self.offer_closed)
	}
}

fn identity(byte: u8) -> Address {
	Address::new_from_array([byte; 32])
}

/// Run the demo.
pub fn run_demo() -> Result<DemoReport, CliError> {
	let mut ledger = Ledger::default();
	ledger.register(Arc::new(EscrowProgram));

	let authority = identity(1);
	let mint_a = identity(2);
	let mint_b = identity(3);
	let maker = identity(10);
	let taker = identity(20);

	for wallet in [authority, maker, taker] {
		ledger.airdrop(&wallet, FAUCET);
	}

	let deposit = ledger.config().rent.minimum_balance(Mint::LEN);
	let mut setup = Vec::new();
	for mint in [mint_a, mint_b] {
		setup.push(system::create_account(
			&authority,
			&mint,
			deposit,
			Mint::LEN as u64,
			&token::ID,
		));
		setup.push(token::instruction::initialize_mint2(
			&mint, &authority, None, DECIMALS,
		));
	}
	for (wallet, mint, amount) in [
		(maker, mint_a, OFFERED_AMOUNT_A),
		(taker, mint_b, WANTED_AMOUNT_B),
	] {
		let holder = associated_token::get_associated_token_address(&wallet, &mint);
		setup.push(associated_token::create(&authority, &wallet, &mint));
		setup.push(token::instruction::mint_to(&mint, &holder, &authority, amount));
	}
	ledger
		.process_transaction(&Transaction::new(setup, &[authority, mint_a, mint_b]))
		.map_err(|failure| CliError::demo("setup", failure))?;

	let (offer, _) = find_offer_address(&maker, OFFER_ID);
	let custody = find_custody_address(&offer, &mint_a);
	let mut logs = Vec::new();

	let make = Transaction::new(
		vec![instruction::make_offer(
			&maker,
			&mint_a,
			&mint_b,
			OFFER_ID,
			OFFERED_AMOUNT_A,
			WANTED_AMOUNT_B,
		)],
		&[maker],
	);
	let receipt = ledger
		.process_transaction(&make)
		.map_err(|failure| CliError::demo("make_offer", failure))?;
	logs.extend(receipt.logs);
	let custody_after_make = token_balance(&ledger, &custody);

	let take = Transaction::new(
		vec![instruction::take_offer(
			&taker, &maker, &mint_a, &mint_b, OFFER_ID,
		)],
		&[taker],
	);
	let receipt = ledger
		.process_transaction(&take)
		.map_err(|failure| CliError::demo("take_offer", failure))?;
	logs.extend(receipt.logs);

	Ok(DemoReport {
		maker: maker.to_string(),
		taker: taker.to_string(),
		offer: offer.to_string(),
		custody: custody.to_string(),
		custody_after_make,
		taker_asset_a: token_balance(
			&ledger,
			&associated_token::get_associated_token_address(&taker, &mint_a),
		),
		maker_asset_b: token_balance(
			&ledger,
			&associated_token::get_associated_token_address(&maker, &mint_b),
		),
		offer_closed: matches!(fetch_offer(&ledger, &offer), Ok(None)),
		logs,
	})
}
