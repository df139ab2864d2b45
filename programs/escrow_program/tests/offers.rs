mod common;

use common::Market;
use common::address;
use escrow_program::EscrowError;
use escrow_program::ID;
use escrow_program::Rejection;
use escrow_program::client::fetch_offer;
use escrow_program::client::fetch_offer_by_id;
use escrow_program::discriminator::OFFER_ACCOUNT;
use escrow_program::instruction;
use escrow_program::state::Offer;
use swap_ledger::Account;
use swap_ledger::ProgramError;
use swap_ledger::Transaction;
use swap_ledger::TransactionError;
use swap_ledger::TransactionFailure;
use swap_ledger::TransactionReceipt;
use swap_ledger::token::TokenError;
use swap_ledger::token::state::TokenAccount;

fn rejection(result: Result<TransactionReceipt, TransactionFailure>) -> Rejection {
	match result {
		Ok(_) => panic!("transaction unexpectedly succeeded"),
		Err(failure) => Rejection::classify(&failure.error),
	}
}

fn program_error(result: Result<TransactionReceipt, TransactionFailure>) -> ProgramError {
	match result {
		Ok(_) => panic!("transaction unexpectedly succeeded"),
		Err(failure) => {
			failure
				.error
				.program_error()
				.unwrap_or_else(|| panic!("not an instruction failure: {}", failure.error))
		}
	}
}

#[test]
fn make_offer_moves_the_offered_amount_into_custody() {
	let market = Market::new();
	let maker_a = market.fund(&market.maker, &market.mint_a, 3_000_000);

	let receipt = market
		.make(1, 1_000_000, 2_000_000)
		.unwrap_or_else(|e| panic!("make offer: {e} {:?}", e.logs));
	assert!(receipt.logs.iter().any(|line| line == "Instruction: MakeOffer"));

	let offer = fetch_offer(&market.ledger, &market.offer_address(1))
		.unwrap_or_else(|e| panic!("fetch offer: {e}"))
		.unwrap_or_else(|| panic!("offer record is missing"));
	assert_eq!(offer.discriminator, OFFER_ACCOUNT);
	assert_eq!(offer.id(), 1);
	assert_eq!(offer.maker, market.maker);
	assert_eq!(offer.asset_a_kind, market.mint_a);
	assert_eq!(offer.asset_b_kind, market.mint_b);
	assert_eq!(offer.wanted_amount_b(), 2_000_000);

	let custody = market.custody_address(1);
	let custody_state = market
		.ledger
		.token_account(&custody)
		.unwrap_or_else(|| panic!("custody account is missing"));
	assert_eq!(custody_state.owner, market.offer_address(1));
	assert_eq!(custody_state.mint, market.mint_a);
	assert_eq!(custody_state.amount(), 1_000_000);
	assert_eq!(market.balance(&maker_a), 2_000_000);

	let rent = market.ledger.config().rent;
	assert_eq!(
		market.ledger.balance(&market.offer_address(1)),
		rent.minimum_balance(Offer::LEN)
	);
	assert_eq!(
		market.ledger.balance(&custody),
		rent.minimum_balance(TokenAccount::LEN)
	);
}

#[test]
fn take_offer_settles_both_legs_and_closes_everything() {
	let market = Market::new();
	market.fund(&market.maker, &market.mint_a, 1_000_000);
	let taker_b = market.fund(&market.taker, &market.mint_b, 2_500_000);
	market
		.make(1, 1_000_000, 2_000_000)
		.unwrap_or_else(|e| panic!("make offer: {e}"));

	let offer = market.offer_address(1);
	let custody = market.custody_address(1);
	let deposits = market.ledger.balance(&offer) + market.ledger.balance(&custody);
	let maker_lamports = market.ledger.balance(&market.maker);

	let receipt = market
		.take(&market.taker, 1)
		.unwrap_or_else(|e| panic!("take offer: {e} {:?}", e.logs));
	assert!(receipt.logs.iter().any(|line| line == "Instruction: TakeOffer"));

	assert!(market.ledger.get_account(&offer).is_none());
	assert!(market.ledger.get_account(&custody).is_none());
	assert_eq!(fetch_offer(&market.ledger, &offer), Ok(None));

	let taker_a = market.holder(&market.taker, &market.mint_a);
	let maker_b = market.holder(&market.maker, &market.mint_b);
	assert_eq!(market.balance(&taker_a), 1_000_000);
	assert_eq!(market.balance(&maker_b), 2_000_000);
	assert_eq!(market.balance(&taker_b), 500_000);
	assert_eq!(
		market.ledger.balance(&market.maker),
		maker_lamports + deposits
	);
}

#[test]
fn taker_destinations_that_already_exist_are_reused() {
	let market = Market::new();
	market.fund(&market.maker, &market.mint_a, 1_000_000);
	let maker_b = market.fund(&market.maker, &market.mint_b, 7);
	let taker_a = market.fund(&market.taker, &market.mint_a, 3);
	market.fund(&market.taker, &market.mint_b, 2_000_000);
	market
		.make(1, 1_000_000, 2_000_000)
		.unwrap_or_else(|e| panic!("make offer: {e}"));

	let taker_lamports = market.ledger.balance(&market.taker);
	market
		.take(&market.taker, 1)
		.unwrap_or_else(|e| panic!("take offer: {e}"));

	assert_eq!(market.balance(&taker_a), 1_000_003);
	assert_eq!(market.balance(&maker_b), 2_000_007);
	assert_eq!(market.ledger.balance(&market.taker), taker_lamports);
}

#[test]
fn maker_without_funds_leaves_no_trace() {
	let market = Market::new();
	let maker_a = market.fund(&market.maker, &market.mint_a, 0);
	let lamports = market.ledger.balance(&market.maker);

	let result = market.make(2, 5_000_000, 2_000_000);
	assert_eq!(
		program_error(result.clone()),
		ProgramError::Token(TokenError::InsufficientFunds)
	);
	assert_eq!(rejection(result), Rejection::InsufficientBalance);

	assert!(market.ledger.get_account(&market.offer_address(2)).is_none());
	assert!(market.ledger.get_account(&market.custody_address(2)).is_none());
	assert_eq!(market.balance(&maker_a), 0);
	assert_eq!(market.ledger.balance(&market.maker), lamports);
}

#[test]
fn source_account_of_another_owner_is_rejected() {
	let market = Market::new();
	let stranger = address(30);
	market.fund(&market.maker, &market.mint_a, 1_000_000);
	let stranger_a = market.fund(&stranger, &market.mint_a, 1_000_000);

	let mut make = instruction::make_offer(&market.maker, &market.mint_a, &market.mint_b, 3, 1_000_000, 1);
	make.accounts[3].address = stranger_a;
	let result = market
		.ledger
		.process_transaction(&Transaction::new(vec![make], &[market.maker]));

	assert_eq!(
		program_error(result.clone()),
		ProgramError::from(EscrowError::TokenOwnerMismatch)
	);
	assert_eq!(rejection(result), Rejection::OwnershipConstraint);
	assert!(market.ledger.get_account(&market.offer_address(3)).is_none());
	assert_eq!(market.balance(&stranger_a), 1_000_000);
}

#[test]
fn taker_without_enough_asset_b_leaves_the_offer_open() {
	let market = Market::new();
	market.fund(&market.maker, &market.mint_a, 1_000_000);
	let taker_b = market.fund(&market.taker, &market.mint_b, 1);
	market
		.make(4, 1_000_000, 2_000_000)
		.unwrap_or_else(|e| panic!("make offer: {e}"));

	let offer = market.offer_address(4);
	let custody = market.custody_address(4);
	let offer_before = market.ledger.get_account(&offer);
	let custody_before = market.ledger.get_account(&custody);

	let result = market.take(&market.taker, 4);
	assert_eq!(
		program_error(result.clone()),
		ProgramError::Token(TokenError::InsufficientFunds)
	);
	assert_eq!(rejection(result), Rejection::InsufficientBalance);

	assert!(offer_before.is_some());
	assert_eq!(market.ledger.get_account(&offer), offer_before);
	assert_eq!(market.ledger.get_account(&custody), custody_before);
	assert_eq!(market.balance(&custody), 1_000_000);
	assert_eq!(market.balance(&taker_b), 1);
	assert!(
		market
			.ledger
			.get_account(&market.holder(&market.taker, &market.mint_a))
			.is_none()
	);
}

#[test]
fn an_offer_can_only_be_taken_once() {
	let market = Market::new();
	let second_taker = address(21);
	market.airdrop(&second_taker);
	market.fund(&market.maker, &market.mint_a, 1_000_000);
	market.fund(&market.taker, &market.mint_b, 2_000_000);
	market.fund(&second_taker, &market.mint_b, 2_000_000);
	market
		.make(1, 1_000_000, 2_000_000)
		.unwrap_or_else(|e| panic!("make offer: {e}"));

	market
		.take(&market.taker, 1)
		.unwrap_or_else(|e| panic!("take offer: {e}"));

	let result = market.take(&second_taker, 1);
	assert_eq!(program_error(result.clone()), ProgramError::UninitializedAccount);
	let rejection = rejection(result);
	assert_eq!(rejection, Rejection::NotFound);
	assert!(!rejection.is_retryable());
	assert_eq!(
		market.balance(&market.holder(&second_taker, &market.mint_b)),
		2_000_000
	);
}

#[test]
fn duplicate_ids_are_rejected() {
	let market = Market::new();
	let maker_a = market.fund(&market.maker, &market.mint_a, 2_000_000);
	market
		.make(1, 1_000_000, 5)
		.unwrap_or_else(|e| panic!("make offer: {e}"));

	let result = market.make(1, 1_000_000, 6);
	assert_eq!(
		program_error(result.clone()),
		ProgramError::AccountAlreadyInitialized
	);
	assert_eq!(rejection(result), Rejection::AlreadyExists);
	assert_eq!(market.balance(&maker_a), 1_000_000);

	let stored = fetch_offer_by_id(&market.ledger, &market.maker, 1)
		.unwrap_or_else(|e| panic!("fetch offer: {e}"))
		.unwrap_or_else(|| panic!("offer record is missing"));
	assert_eq!(stored.wanted_amount_b(), 5);

	market
		.make(2, 1_000_000, 6)
		.unwrap_or_else(|e| panic!("make offer with a fresh id: {e}"));
}

#[test]
fn invalid_requests_are_rejected_before_any_effect() {
	let market = Market::new();
	let maker_a = market.fund(&market.maker, &market.mint_a, 1_000_000);

	let zero = market.make(1, 0, 5);
	assert_eq!(
		program_error(zero.clone()),
		ProgramError::from(EscrowError::InvalidOfferedAmount)
	);
	assert_eq!(rejection(zero), Rejection::InvalidInput);

	let same_kind = instruction::make_offer(&market.maker, &market.mint_a, &market.mint_a, 1, 10, 5);
	let result = market
		.ledger
		.process_transaction(&Transaction::new(vec![same_kind], &[market.maker]));
	assert_eq!(
		program_error(result.clone()),
		ProgramError::from(EscrowError::IdenticalAssetKinds)
	);
	assert_eq!(rejection(result), Rejection::InvalidInput);

	assert!(market.ledger.get_account(&market.offer_address(1)).is_none());
	assert_eq!(market.balance(&maker_a), 1_000_000);
}

#[test]
fn substituted_custody_account_is_rejected() {
	let market = Market::new();
	let maker_a = market.fund(&market.maker, &market.mint_a, 2_000_000);
	market.fund(&market.taker, &market.mint_b, 2_000_000);
	market
		.make(1, 1_000_000, 2_000_000)
		.unwrap_or_else(|e| panic!("make offer: {e}"));

	let mut take = instruction::take_offer(&market.taker, &market.maker, &market.mint_a, &market.mint_b, 1);
	take.accounts[8].address = maker_a;
	let result = market
		.ledger
		.process_transaction(&Transaction::new(vec![take], &[market.taker]));

	assert_eq!(
		program_error(result.clone()),
		ProgramError::from(EscrowError::CustodyAddressMismatch)
	);
	assert_eq!(rejection(result), Rejection::AddressMismatch);
	assert_eq!(market.balance(&market.custody_address(1)), 1_000_000);
}

#[test]
fn asset_a_must_go_to_the_takers_associated_account() {
	let market = Market::new();
	let stranger = address(31);
	market.fund(&market.maker, &market.mint_a, 1_000_000);
	market.fund(&market.taker, &market.mint_b, 2_000_000);
	let stranger_a = market.fund(&stranger, &market.mint_a, 0);
	market
		.make(1, 1_000_000, 2_000_000)
		.unwrap_or_else(|e| panic!("make offer: {e}"));

	let mut take = instruction::take_offer(&market.taker, &market.maker, &market.mint_a, &market.mint_b, 1);
	take.accounts[4].address = stranger_a;
	let result = market
		.ledger
		.process_transaction(&Transaction::new(vec![take], &[market.taker]));

	assert_eq!(
		program_error(result.clone()),
		ProgramError::from(EscrowError::AssociatedAccountMismatch)
	);
	assert_eq!(rejection(result), Rejection::AddressMismatch);
	assert_eq!(market.balance(&stranger_a), 0);
}

#[test]
fn forged_offer_record_is_rejected() {
	let market = Market::new();
	market.fund(&market.maker, &market.mint_a, 1_000_000);
	let taker_b = market.fund(&market.taker, &market.mint_b, 2_000_000);
	market
		.make(1, 1_000_000, 2_000_000)
		.unwrap_or_else(|e| panic!("make offer: {e}"));

	// A copy of offer 1 stored where offer 2 would live: its maker, id and
	// bump derive offer 1's address, not the one it sits at.
	let genuine = market
		.ledger
		.get_account(&market.offer_address(1))
		.unwrap_or_else(|| panic!("offer record is missing"));
	let mut forged = Account::new(genuine.lamports, Offer::LEN, &ID);
	forged.data.copy_from_slice(&genuine.data);
	market.ledger.set_account(market.offer_address(2), forged);

	let result = market.take(&market.taker, 2);

	assert_eq!(
		program_error(result.clone()),
		ProgramError::from(EscrowError::OfferAddressMismatch)
	);
	assert_eq!(rejection(result), Rejection::AddressMismatch);
	assert_eq!(market.balance(&market.custody_address(1)), 1_000_000);
	assert_eq!(market.balance(&taker_b), 2_000_000);
	assert!(
		market
			.ledger
			.get_account(&market.holder(&market.maker, &market.mint_b))
			.is_none()
	);
}

#[test]
fn swapped_asset_kinds_are_rejected() {
	let market = Market::new();
	market.fund(&market.maker, &market.mint_a, 1_000_000);
	market.fund(&market.taker, &market.mint_a, 1_000_000);
	let taker_b = market.fund(&market.taker, &market.mint_b, 2_000_000);
	market
		.make(1, 1_000_000, 2_000_000)
		.unwrap_or_else(|e| panic!("make offer: {e}"));

	let take = instruction::take_offer(&market.taker, &market.maker, &market.mint_b, &market.mint_a, 1);
	let result = market
		.ledger
		.process_transaction(&Transaction::new(vec![take], &[market.taker]));

	assert_eq!(
		program_error(result.clone()),
		ProgramError::from(EscrowError::AssetKindMismatch)
	);
	assert_eq!(rejection(result), Rejection::AddressMismatch);
	assert_eq!(market.balance(&market.custody_address(1)), 1_000_000);
	assert_eq!(market.balance(&taker_b), 2_000_000);
}

#[test]
fn maker_source_of_the_wrong_asset_kind_is_rejected() {
	let market = Market::new();
	let maker_a = market.fund(&market.maker, &market.mint_a, 1_000_000);
	let maker_b = market.fund(&market.maker, &market.mint_b, 1_000_000);

	let mut make = instruction::make_offer(&market.maker, &market.mint_a, &market.mint_b, 1, 1_000_000, 1);
	make.accounts[3].address = maker_b;
	let result = market
		.ledger
		.process_transaction(&Transaction::new(vec![make], &[market.maker]));

	assert_eq!(
		program_error(result.clone()),
		ProgramError::from(EscrowError::TokenMintMismatch)
	);
	assert_eq!(rejection(result), Rejection::OwnershipConstraint);
	assert!(market.ledger.get_account(&market.offer_address(1)).is_none());
	assert_eq!(market.balance(&maker_a), 1_000_000);
	assert_eq!(market.balance(&maker_b), 1_000_000);
}

#[test]
fn taker_source_of_the_wrong_asset_kind_is_rejected() {
	let market = Market::new();
	market.fund(&market.maker, &market.mint_a, 1_000_000);
	let taker_a = market.fund(&market.taker, &market.mint_a, 5_000_000);
	market.fund(&market.taker, &market.mint_b, 2_000_000);
	market
		.make(1, 1_000_000, 2_000_000)
		.unwrap_or_else(|e| panic!("make offer: {e}"));

	let mut take = instruction::take_offer(&market.taker, &market.maker, &market.mint_a, &market.mint_b, 1);
	take.accounts[5].address = taker_a;
	let result = market
		.ledger
		.process_transaction(&Transaction::new(vec![take], &[market.taker]));

	assert_eq!(
		program_error(result.clone()),
		ProgramError::from(EscrowError::TokenMintMismatch)
	);
	assert_eq!(rejection(result), Rejection::OwnershipConstraint);
	assert_eq!(market.balance(&market.custody_address(1)), 1_000_000);
	assert_eq!(market.balance(&taker_a), 5_000_000);
	let offer = fetch_offer_by_id(&market.ledger, &market.maker, 1)
		.unwrap_or_else(|e| panic!("fetch offer: {e}"));
	assert!(offer.is_some());
}

#[test]
fn maker_must_sign_and_maker_must_match() {
	let market = Market::new();
	market.fund(&market.maker, &market.mint_a, 1_000_000);
	market.fund(&market.taker, &market.mint_b, 2_000_000);

	let unsigned = Transaction::new(
		vec![instruction::make_offer(&market.maker, &market.mint_a, &market.mint_b, 1, 10, 5)],
		&[],
	);
	let failure = market
		.ledger
		.process_transaction(&unsigned)
		.err()
		.unwrap_or_else(|| panic!("unsigned offer succeeded"));
	assert_eq!(failure.error, TransactionError::MissingSignature(market.maker));
	assert_eq!(Rejection::classify(&failure.error), Rejection::OwnershipConstraint);

	market
		.make(1, 10, 5)
		.unwrap_or_else(|e| panic!("make offer: {e}"));

	let mut take = instruction::take_offer(&market.taker, &market.maker, &market.mint_a, &market.mint_b, 1);
	take.accounts[1].address = market.taker;
	let result = market
		.ledger
		.process_transaction(&Transaction::new(vec![take], &[market.taker]));
	assert_eq!(program_error(result), ProgramError::from(EscrowError::MakerMismatch));
}

#[test]
fn failed_take_in_a_batch_rolls_back_earlier_instructions() {
	let market = Market::new();
	let maker_a = market.fund(&market.maker, &market.mint_a, 1_000_000);
	let taker_b = market.fund(&market.taker, &market.mint_b, 1_000);
	let taker_a = market.holder(&market.taker, &market.mint_a);

	let transaction = Transaction::new(
		vec![
			instruction::make_offer(&market.maker, &market.mint_a, &market.mint_b, 1, 1_000_000, 2_000),
			instruction::take_offer(&market.taker, &market.maker, &market.mint_a, &market.mint_b, 1),
		],
		&[market.maker, market.taker],
	);
	let failure = market
		.ledger
		.process_transaction(&transaction)
		.err()
		.unwrap_or_else(|| panic!("batch unexpectedly succeeded"));

	assert_eq!(
		failure.error,
		TransactionError::InstructionError {
			index: 1,
			error: TokenError::InsufficientFunds.into(),
		}
	);
	assert!(failure.logs.iter().any(|line| line.contains("success")));
	assert!(market.ledger.get_account(&market.offer_address(1)).is_none());
	assert_eq!(market.balance(&maker_a), 1_000_000);
	assert_eq!(market.balance(&taker_b), 1_000);
	assert!(market.ledger.get_account(&taker_a).is_none());
}
