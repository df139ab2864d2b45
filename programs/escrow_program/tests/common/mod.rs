#![allow(dead_code)]

use std::sync::Arc;

use escrow_program::EscrowProgram;
use escrow_program::client::token_balance;
use escrow_program::instruction;
use escrow_program::pda::find_custody_address;
use escrow_program::pda::find_offer_address;
use swap_ledger::Address;
use swap_ledger::Ledger;
use swap_ledger::Transaction;
use swap_ledger::TransactionFailure;
use swap_ledger::TransactionReceipt;
use swap_ledger::associated_token;
use swap_ledger::system;
use swap_ledger::token;
use swap_ledger::token::state::Mint;

pub const DECIMALS_A: u8 = 6;
pub const DECIMALS_B: u8 = 9;
pub const LAMPORTS: u64 = 10_000_000_000;

pub fn address(byte: u8) -> Address {
	Address::new_from_array([byte; 32])
}

/// A ledger with the escrow program installed, two asset kinds and a funded
/// maker and taker.
pub struct Market {
	pub ledger: Ledger,
	pub authority: Address,
	pub mint_a: Address,
	pub mint_b: Address,
	pub maker: Address,
	pub taker: Address,
}

impl Market {
	pub fn new() -> Self {
		let mut ledger = Ledger::default();
		ledger.register(Arc::new(EscrowProgram));

		let market = Self {
			ledger,
			authority: address(1),
			mint_a: address(2),
			mint_b: address(3),
			maker: address(10),
			taker: address(20),
		};

		for wallet in [market.authority, market.maker, market.taker] {
			market.airdrop(&wallet);
		}
		market.create_mint(&market.mint_a, DECIMALS_A);
		market.create_mint(&market.mint_b, DECIMALS_B);

		market
	}

	pub fn airdrop(&self, wallet: &Address) {
		self.ledger.airdrop(wallet, LAMPORTS);
	}

	fn create_mint(&self, mint: &Address, decimals: u8) {
		let deposit = self.ledger.config().rent.minimum_balance(Mint::LEN);
		let transaction = Transaction::new(
			vec![
				system::create_account(&self.authority, mint, deposit, Mint::LEN as u64, &token::ID),
				token::instruction::initialize_mint2(mint, &self.authority, None, decimals),
			],
			&[self.authority, *mint],
		);
		self.ledger
			.process_transaction(&transaction)
			.unwrap_or_else(|e| panic!("create mint: {e}"));
	}

	/// Make sure `wallet` has an associated account of `mint` holding at
	/// least `amount` more than before, and return its address.
	pub fn fund(&self, wallet: &Address, mint: &Address, amount: u64) -> Address {
		let holder = associated_token::get_associated_token_address(wallet, mint);
		let mut instructions = vec![associated_token::create_idempotent(
			&self.authority,
			wallet,
			mint,
		)];
		if amount > 0 {
			instructions.push(token::instruction::mint_to(
				mint,
				&holder,
				&self.authority,
				amount,
			));
		}

		self.ledger
			.process_transaction(&Transaction::new(instructions, &[self.authority]))
			.unwrap_or_else(|e| panic!("fund: {e}"));

		holder
	}

	pub fn offer_address(&self, id: u64) -> Address {
		find_offer_address(&self.maker, id).0
	}

	pub fn custody_address(&self, id: u64) -> Address {
		find_custody_address(&self.offer_address(id), &self.mint_a)
	}

	pub fn balance(&self, account: &Address) -> u64 {
		token_balance(&self.ledger, account)
	}

	pub fn holder(&self, wallet: &Address, mint: &Address) -> Address {
		associated_token::get_associated_token_address(wallet, mint)
	}

	pub fn make_transaction(&self, id: u64, offered: u64, wanted: u64) -> Transaction {
		Transaction::new(
			vec![instruction::make_offer(
				&self.maker,
				&self.mint_a,
				&self.mint_b,
				id,
				offered,
				wanted,
			)],
			&[self.maker],
		)
	}

	pub fn take_transaction(&self, taker: &Address, id: u64) -> Transaction {
		Transaction::new(
			vec![instruction::take_offer(
				taker,
				&self.maker,
				&self.mint_a,
				&self.mint_b,
				id,
			)],
			&[*taker],
		)
	}

	pub fn make(
		&self,
		id: u64,
		offered: u64,
		wanted: u64,
	) -> Result<TransactionReceipt, TransactionFailure> {
		self.ledger
			.process_transaction(&self.make_transaction(id, offered, wanted))
	}

	pub fn take(&self, taker: &Address, id: u64) -> Result<TransactionReceipt, TransactionFailure> {
		self.ledger
			.process_transaction(&self.take_transaction(taker, id))
	}
}
