use pina_pod_primitives::PodU64;

use super::ID;
use super::TokenError;
use super::instruction::TokenInstruction;
use super::state::AccountState;
use super::state::Mint;
use super::state::TokenAccount;
use crate::AccountInfoValidation;
use crate::AccountMeta;
use crate::Address;
use crate::InvokeContext;
use crate::Program;
use crate::ProgramError;
use crate::ProgramResult;
use crate::log;
use crate::pod::PodOptionTag;

pub struct TokenProgram;

impl Program for TokenProgram {
	fn id(&self) -> Address {
		ID
	}

	fn process(
		&self,
		ctx: &mut InvokeContext<'_>,
		accounts: &[AccountMeta],
		data: &[u8],
	) -> ProgramResult {
		match TokenInstruction::unpack(data)? {
			TokenInstruction::InitializeMint2 {
				decimals,
				mint_authority,
				freeze_authority,
			} => {
				ctx.log("Instruction: InitializeMint2");
				process_initialize_mint(ctx, accounts, decimals, &mint_authority, freeze_authority)
			}
			TokenInstruction::InitializeAccount3 { owner } => {
				ctx.log("Instruction: InitializeAccount3");
				process_initialize_account(ctx, accounts, &owner)
			}
			TokenInstruction::MintTo { amount } => {
				ctx.log("Instruction: MintTo");
				process_mint_to(ctx, accounts, amount)
			}
			TokenInstruction::TransferChecked { amount, decimals } => {
				ctx.log("Instruction: TransferChecked");
				process_transfer(ctx, accounts, amount, decimals)
			}
			TokenInstruction::CloseAccount => {
				ctx.log("Instruction: CloseAccount");
				process_close_account(ctx, accounts)
			}
		}
	}
}

fn process_initialize_mint(
	ctx: &mut InvokeContext<'_>,
	accounts: &[AccountMeta],
	decimals: u8,
	mint_authority: &Address,
	freeze_authority: Option<Address>,
) -> ProgramResult {
	let [mint, ..] = accounts else {
		return Err(ProgramError::NotEnoughAccountKeys);
	};

	let rent = ctx.rent();
	let view = ctx.view(mint)?;
	view.assert_writable()?.assert_owner(&ID)?;
	if !rent.is_exempt(view.lamports(), view.data().len()) {
		return Err(TokenError::NotRentExempt.into());
	}

	let state = Mint::unpack_unchecked_mut(&mut ctx.account_mut(&mint.address)?.data)?;
	if state.is_initialized() {
		return Err(TokenError::AlreadyInUse.into());
	}

	state.mint_authority_tag = PodOptionTag::SOME;
	state.mint_authority = *mint_authority;
	state.decimals = decimals;
	state.is_initialized = 1;
	state.freeze_authority_tag = PodOptionTag::from_bool(freeze_authority.is_some());
	state.freeze_authority = freeze_authority.unwrap_or(Address::new_from_array([0; 32]));

	Ok(())
}

fn process_initialize_account(
	ctx: &mut InvokeContext<'_>,
	accounts: &[AccountMeta],
	owner: &Address,
) -> ProgramResult {
	let [account, mint, ..] = accounts else {
		return Err(ProgramError::NotEnoughAccountKeys);
	};

	let rent = ctx.rent();
	let view = ctx.view(account)?;
	view.assert_writable()?.assert_owner(&ID)?;
	if !rent.is_exempt(view.lamports(), view.data().len()) {
		return Err(TokenError::NotRentExempt.into());
	}

	ctx.view(mint)?
		.as_mint()
		.map_err(|_| TokenError::InvalidMint)?;

	let state = TokenAccount::unpack_unchecked_mut(&mut ctx.account_mut(&account.address)?.data)?;
	if state.is_initialized() {
		return Err(TokenError::AlreadyInUse.into());
	}

	state.mint = mint.address;
	state.owner = *owner;
	state.amount = PodU64::from_primitive(0);
	state.state = AccountState::Initialized as u8;

	Ok(())
}

fn process_mint_to(
	ctx: &mut InvokeContext<'_>,
	accounts: &[AccountMeta],
	amount: u64,
) -> ProgramResult {
	let [mint, destination, authority, ..] = accounts else {
		return Err(ProgramError::NotEnoughAccountKeys);
	};

	let destination_state = *ctx.view(destination)?.as_token_account()?;
	if destination_state.is_frozen() {
		return Err(TokenError::AccountFrozen.into());
	}
	if destination_state.mint != mint.address {
		return Err(TokenError::MintMismatch.into());
	}

	let mint_state = *ctx.view(mint)?.as_mint()?;
	let Some(mint_authority) = mint_state.mint_authority() else {
		return Err(TokenError::FixedSupply.into());
	};
	validate_owner(ctx, mint_authority, authority)?;

	let supply = mint_state
		.supply()
		.checked_add(amount)
		.ok_or(TokenError::Overflow)?;
	let balance = destination_state
		.amount()
		.checked_add(amount)
		.ok_or(TokenError::Overflow)?;

	Mint::unpack_mut(&mut ctx.account_mut(&mint.address)?.data)?.supply = supply.into();
	token_account_mut(ctx, &destination.address)?.amount = balance.into();

	Ok(())
}

fn process_transfer(
	ctx: &mut InvokeContext<'_>,
	accounts: &[AccountMeta],
	amount: u64,
	decimals: u8,
) -> ProgramResult {
	let [source, mint, destination, authority, ..] = accounts else {
		return Err(ProgramError::NotEnoughAccountKeys);
	};

	let source_state = *ctx.view(source)?.as_token_account()?;
	let destination_state = *ctx.view(destination)?.as_token_account()?;

	if source_state.is_frozen() || destination_state.is_frozen() {
		return Err(TokenError::AccountFrozen.into());
	}
	if source_state.amount() < amount {
		log!("Error: insufficient funds");
		return Err(TokenError::InsufficientFunds.into());
	}
	if source_state.mint != destination_state.mint {
		return Err(TokenError::MintMismatch.into());
	}
	if source_state.mint != mint.address {
		return Err(TokenError::MintMismatch.into());
	}

	let mint_state = ctx.view(mint)?.as_mint()?;
	if mint_state.decimals != decimals {
		return Err(TokenError::MintDecimalsMismatch.into());
	}

	validate_owner(ctx, &source_state.owner, authority)?;

	if source.address == destination.address {
		return Ok(());
	}

	let credited = destination_state
		.amount()
		.checked_add(amount)
		.ok_or(TokenError::Overflow)?;

	token_account_mut(ctx, &source.address)?.amount = (source_state.amount() - amount).into();
	token_account_mut(ctx, &destination.address)?.amount = credited.into();

	Ok(())
}

fn process_close_account(ctx: &mut InvokeContext<'_>, accounts: &[AccountMeta]) -> ProgramResult {
	let [account, destination, authority, ..] = accounts else {
		return Err(ProgramError::NotEnoughAccountKeys);
	};

	if account.address == destination.address {
		return Err(ProgramError::InvalidAccountData);
	}

	let state = *ctx.view(account)?.as_token_account()?;
	if state.amount() != 0 {
		return Err(TokenError::NonNativeHasBalance.into());
	}

	let close_authority = state.close_authority().unwrap_or(&state.owner);
	validate_owner(ctx, close_authority, authority)?;

	ctx.view(destination)?.assert_writable()?;
	ctx.close_account(&account.address, &destination.address)
}

/// Check that `authority` is `expected` and signed the instruction.
fn validate_owner(
	ctx: &InvokeContext<'_>,
	expected: &Address,
	authority: &AccountMeta,
) -> ProgramResult {
	if *expected != authority.address {
		log!("Error: owner does not match");
		return Err(TokenError::OwnerMismatch.into());
	}

	ctx.view(authority)?.assert_signer()?;

	Ok(())
}

fn token_account_mut<'c>(
	ctx: &'c mut InvokeContext<'_>,
	address: &Address,
) -> Result<&'c mut TokenAccount, ProgramError> {
	TokenAccount::unpack_mut(&mut ctx.account_mut(address)?.data)
}
