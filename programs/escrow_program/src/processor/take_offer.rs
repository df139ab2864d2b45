use swap_ledger::AccountInfoValidation;
use swap_ledger::AccountMeta;
use swap_ledger::Address;
use swap_ledger::InvokeContext;
use swap_ledger::ProgramError;
use swap_ledger::ProgramResult;
use swap_ledger::associated_token;
use swap_ledger::associated_token::try_find_associated_token_address;
use swap_ledger::log;
use swap_ledger::system;
use swap_ledger::token;
use swap_ledger::token::TokenError;

use crate::EscrowError;
use crate::ID;
use crate::offer_seeds;
use crate::pda::create_offer_address;
use crate::pda::try_find_custody_address;
use crate::state::Offer;

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Accounts for the `TakeOffer` instruction.
#[derive(Debug)]
pub struct TakeOfferAccounts<'a> {
	/// Fulfils the offer. Signs, pays asset B and any missing destination
	/// account.
	pub taker: &'a AccountMeta,
	/// Creator of the offer. Receives asset B and every reclaimed deposit.
	pub maker: &'a AccountMeta,
	pub asset_a_kind: &'a AccountMeta,
	pub asset_b_kind: &'a AccountMeta,
	/// The taker's associated asset A account, created if missing.
	pub taker_asset_a: &'a AccountMeta,
	/// The taker's asset B account, debited by the wanted amount.
	pub taker_asset_b: &'a AccountMeta,
	/// The maker's associated asset B account, created if missing.
	pub maker_asset_b: &'a AccountMeta,
	pub offer: &'a AccountMeta,
	pub custody: &'a AccountMeta,
	pub system_program: &'a AccountMeta,
	pub token_program: &'a AccountMeta,
	pub associated_token_program: &'a AccountMeta,
}

impl<'a> TryFrom<&'a [AccountMeta]> for TakeOfferAccounts<'a> {
	type Error = ProgramError;

	fn try_from(accounts: &'a [AccountMeta]) -> Result<Self, Self::Error> {
		let [
			taker,
			maker,
			asset_a_kind,
			asset_b_kind,
			taker_asset_a,
			taker_asset_b,
			maker_asset_b,
			offer,
			custody,
			system_program,
			token_program,
			associated_token_program,
			..,
		] = accounts
		else {
			return Err(ProgramError::NotEnoughAccountKeys);
		};

		Ok(Self {
			taker,
			maker,
			asset_a_kind,
			asset_b_kind,
			taker_asset_a,
			taker_asset_b,
			maker_asset_b,
			offer,
			custody,
			system_program,
			token_program,
			associated_token_program,
		})
	}
}

/// Fail with [`EscrowError::AssociatedAccountMismatch`] unless `account` is
/// the associated account of `(wallet, mint)`.
fn assert_associated(account: &AccountMeta, wallet: &Address, mint: &Address) -> ProgramResult {
	let (expected, _) =
		try_find_associated_token_address(wallet, mint).ok_or(ProgramError::InvalidSeeds)?;
	if expected != account.address {
		log!(
			"address: {} is not the associated account of its owner",
			account.address.as_ref()
		);
		return Err(EscrowError::AssociatedAccountMismatch.into());
	}

	Ok(())
}

// ---------------------------------------------------------------------------
// Processor
// ---------------------------------------------------------------------------

impl TakeOfferAccounts<'_> {
	pub fn process(&self, ctx: &mut InvokeContext<'_>) -> ProgramResult {
		let taker = &self.taker.address;
		let maker = &self.maker.address;
		let asset_a_kind = &self.asset_a_kind.address;
		let asset_b_kind = &self.asset_b_kind.address;
		let offer_address = &self.offer.address;
		let custody = &self.custody.address;

		// --- Validate accounts ---

		ctx.view(self.taker)?.assert_signer()?.assert_writable()?;
		ctx.view(self.maker)?.assert_writable()?;
		ctx.view(self.system_program)?.assert_program(&system::ID)?;
		ctx.view(self.token_program)?.assert_program(&token::ID)?;
		ctx.view(self.associated_token_program)?
			.assert_program(&associated_token::ID)?;

		let offer = {
			let view = ctx.view(self.offer)?;
			view.assert_writable()?.assert_not_empty()?.assert_owner(&ID)?;
			*Offer::try_from_bytes(view.data())?
		};

		if create_offer_address(&offer.maker, offer.id(), offer.bump)? != *offer_address {
			log!(
				"address: {} does not match the stored offer fields",
				offer_address.as_ref()
			);
			return Err(EscrowError::OfferAddressMismatch.into());
		}
		if offer.maker != *maker {
			return Err(EscrowError::MakerMismatch.into());
		}
		if offer.asset_a_kind != *asset_a_kind || offer.asset_b_kind != *asset_b_kind {
			return Err(EscrowError::AssetKindMismatch.into());
		}

		let (expected_custody, _) = try_find_custody_address(offer_address, asset_a_kind)
			.ok_or(ProgramError::InvalidSeeds)?;
		if expected_custody != *custody {
			return Err(EscrowError::CustodyAddressMismatch.into());
		}
		let held = ctx
			.view(self.custody)?
			.assert_writable()?
			.as_token_account()?
			.amount();

		ctx.view(self.taker_asset_a)?.assert_writable()?;
		ctx.view(self.maker_asset_b)?.assert_writable()?;
		assert_associated(self.taker_asset_a, taker, asset_a_kind)?;
		assert_associated(self.maker_asset_b, maker, asset_b_kind)?;

		let source = *ctx
			.view(self.taker_asset_b)?
			.assert_writable()?
			.as_token_account()?;
		if source.owner != *taker {
			log!(
				"address: {} is not controlled by the taker",
				self.taker_asset_b.address.as_ref()
			);
			return Err(EscrowError::TokenOwnerMismatch.into());
		}
		if source.mint != *asset_b_kind {
			return Err(EscrowError::TokenMintMismatch.into());
		}
		let wanted = offer.wanted_amount_b();
		if source.amount() < wanted {
			log!("taker balance is below the wanted amount");
			return Err(TokenError::InsufficientFunds.into());
		}

		let decimals_a = ctx.view(self.asset_a_kind)?.as_mint()?.decimals;
		let decimals_b = ctx.view(self.asset_b_kind)?.as_mint()?.decimals;

		// --- Destination accounts ---

		ctx.invoke(&associated_token::create_instruction(
			taker,
			&self.taker_asset_a.address,
			taker,
			asset_a_kind,
			true,
		))?;
		ctx.invoke(&associated_token::create_instruction(
			taker,
			&self.maker_asset_b.address,
			maker,
			asset_b_kind,
			true,
		))?;

		// --- Swap ---

		ctx.invoke(&token::instruction::transfer_checked(
			&self.taker_asset_b.address,
			asset_b_kind,
			&self.maker_asset_b.address,
			taker,
			wanted,
			decimals_b,
		))?;

		let id_bytes = offer.id().to_le_bytes();
		let bump_bytes = [offer.bump];
		let seeds: &[&[u8]] = offer_seeds!(offer.maker.as_ref(), &id_bytes, &bump_bytes);

		ctx.invoke_signed(
			&token::instruction::transfer_checked(
				custody,
				asset_a_kind,
				&self.taker_asset_a.address,
				offer_address,
				held,
				decimals_a,
			),
			&[seeds],
		)?;

		// --- Close custody and the offer record ---

		ctx.invoke_signed(
			&token::instruction::close_account(custody, maker, offer_address),
			&[seeds],
		)?;
		ctx.close_account(offer_address, maker)?;

		log!("Offer taken");

		Ok(())
	}
}
