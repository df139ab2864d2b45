use swap_ledger::AccountInfoValidation;
use swap_ledger::AccountMeta;
use swap_ledger::InvokeContext;
use swap_ledger::ProgramError;
use swap_ledger::ProgramResult;
use swap_ledger::associated_token;
use swap_ledger::log;
use swap_ledger::system;
use swap_ledger::token;
use swap_ledger::token::TokenError;

use crate::EscrowError;
use crate::ID;
use crate::offer_seeds;
use crate::pda::try_find_custody_address;
use crate::pda::try_find_offer_address;
use crate::state::Offer;

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Accounts for the `MakeOffer` instruction.
#[derive(Debug)]
pub struct MakeOfferAccounts<'a> {
	/// Creator of the offer. Signs, pays both deposits and funds custody.
	pub maker: &'a AccountMeta,
	/// Mint of the asset placed in custody.
	pub asset_a_kind: &'a AccountMeta,
	/// Mint of the asset wanted in exchange.
	pub asset_b_kind: &'a AccountMeta,
	/// The maker's asset A account, debited by the offered amount.
	pub maker_asset_a: &'a AccountMeta,
	/// Offer record at `["offer", maker, id]`. Must not exist yet.
	pub offer: &'a AccountMeta,
	/// Associated asset A account of the offer record. Must not exist yet.
	pub custody: &'a AccountMeta,
	pub system_program: &'a AccountMeta,
	pub token_program: &'a AccountMeta,
	pub associated_token_program: &'a AccountMeta,
}

impl<'a> TryFrom<&'a [AccountMeta]> for MakeOfferAccounts<'a> {
	type Error = ProgramError;

	fn try_from(accounts: &'a [AccountMeta]) -> Result<Self, Self::Error> {
		let [
			maker,
			asset_a_kind,
			asset_b_kind,
			maker_asset_a,
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
			maker,
			asset_a_kind,
			asset_b_kind,
			maker_asset_a,
			offer,
			custody,
			system_program,
			token_program,
			associated_token_program,
		})
	}
}

// ---------------------------------------------------------------------------
// Processor
// ---------------------------------------------------------------------------

impl MakeOfferAccounts<'_> {
	pub fn process(
		&self,
		ctx: &mut InvokeContext<'_>,
		id: u64,
		offered_amount_a: u64,
		wanted_amount_b: u64,
	) -> ProgramResult {
		let maker = &self.maker.address;
		let asset_a_kind = &self.asset_a_kind.address;
		let asset_b_kind = &self.asset_b_kind.address;

		// --- Validate accounts ---

		ctx.view(self.maker)?.assert_signer()?.assert_writable()?;
		ctx.view(self.system_program)?.assert_program(&system::ID)?;
		ctx.view(self.token_program)?.assert_program(&token::ID)?;
		ctx.view(self.associated_token_program)?
			.assert_program(&associated_token::ID)?;

		let source = *ctx
			.view(self.maker_asset_a)?
			.assert_writable()?
			.as_token_account()?;
		if source.owner != *maker {
			log!(
				"address: {} is not controlled by the maker",
				self.maker_asset_a.address.as_ref()
			);
			return Err(EscrowError::TokenOwnerMismatch.into());
		}
		if source.mint != *asset_a_kind {
			return Err(EscrowError::TokenMintMismatch.into());
		}

		let decimals = ctx.view(self.asset_a_kind)?.as_mint()?.decimals;
		ctx.view(self.asset_b_kind)?.as_mint()?;
		if asset_a_kind == asset_b_kind {
			return Err(EscrowError::IdenticalAssetKinds.into());
		}

		let (offer, bump) = try_find_offer_address(maker, id).ok_or(ProgramError::InvalidSeeds)?;
		if offer != self.offer.address {
			log!(
				"address: {} is not the offer record for this maker and id",
				self.offer.address.as_ref()
			);
			return Err(EscrowError::OfferAddressMismatch.into());
		}
		ctx.view(self.offer)?.assert_writable()?.assert_empty()?;

		let (custody, _) =
			try_find_custody_address(&offer, asset_a_kind).ok_or(ProgramError::InvalidSeeds)?;
		if custody != self.custody.address {
			return Err(EscrowError::CustodyAddressMismatch.into());
		}
		ctx.view(self.custody)?.assert_writable()?.assert_empty()?;

		if offered_amount_a == 0 {
			return Err(EscrowError::InvalidOfferedAmount.into());
		}
		if source.amount() < offered_amount_a {
			log!("maker balance is below the offered amount");
			return Err(TokenError::InsufficientFunds.into());
		}

		// --- Create the offer record ---

		let id_bytes = id.to_le_bytes();
		let bump_bytes = [bump];
		let seeds: &[&[u8]] = offer_seeds!(maker.as_ref(), &id_bytes, &bump_bytes);
		let lamports = ctx.rent().minimum_balance(Offer::LEN);

		ctx.invoke_signed(
			&system::create_account(maker, &offer, lamports, Offer::LEN as u64, &ID),
			&[seeds],
		)?;

		let record = Offer::builder()
			.id(id)
			.maker(*maker)
			.asset_a_kind(*asset_a_kind)
			.asset_b_kind(*asset_b_kind)
			.wanted_amount_b(wanted_amount_b)
			.bump(bump)
			.build();
		ctx.account_mut(&offer)?
			.data
			.copy_from_slice(bytemuck::bytes_of(&record));

		// --- Fund custody ---

		ctx.invoke(&associated_token::create_instruction(
			maker,
			&custody,
			&offer,
			asset_a_kind,
			false,
		))?;

		ctx.invoke(&token::instruction::transfer_checked(
			&self.maker_asset_a.address,
			asset_a_kind,
			&custody,
			maker,
			offered_amount_a,
			decimals,
		))?;

		log!("Offer created");

		Ok(())
	}
}
