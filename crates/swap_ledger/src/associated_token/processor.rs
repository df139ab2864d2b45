use super::CREATE;
use super::CREATE_IDEMPOTENT;
use super::ID;
use super::try_find_associated_token_address;
use crate::AccountInfoValidation;
use crate::AccountMeta;
use crate::Address;
use crate::InvokeContext;
use crate::Program;
use crate::ProgramError;
use crate::ProgramResult;
use crate::log;
use crate::system;
use crate::token;
use crate::token::state::TokenAccount;

pub struct AssociatedTokenProgram;

impl Program for AssociatedTokenProgram {
	fn id(&self) -> Address {
		ID
	}

	fn process(
		&self,
		ctx: &mut InvokeContext<'_>,
		accounts: &[AccountMeta],
		data: &[u8],
	) -> ProgramResult {
		let idempotent = match data {
			[] | [CREATE] => false,
			[CREATE_IDEMPOTENT] => true,
			_ => return Err(ProgramError::InvalidInstructionData),
		};

		process_create(ctx, accounts, idempotent)
	}
}

fn process_create(
	ctx: &mut InvokeContext<'_>,
	accounts: &[AccountMeta],
	idempotent: bool,
) -> ProgramResult {
	let [payer, associated, wallet, mint, system_program, token_program, ..] = accounts else {
		return Err(ProgramError::NotEnoughAccountKeys);
	};

	ctx.view(system_program)?.assert_program(&system::ID)?;
	ctx.view(token_program)?.assert_program(&token::ID)?;

	let (expected, bump) = try_find_associated_token_address(&wallet.address, &mint.address)
		.ok_or(ProgramError::InvalidSeeds)?;
	if expected != associated.address {
		log!(
			"address: {} is not the associated account for this wallet and mint",
			associated.address.as_ref()
		);
		return Err(ProgramError::InvalidSeeds);
	}

	let existing = ctx.account(&associated.address)?;
	if idempotent
		&& existing.owner == token::ID
		&& let Ok(state) = TokenAccount::unpack(&existing.data)
	{
		if state.owner != wallet.address {
			return Err(ProgramError::IllegalOwner);
		}
		if state.mint != mint.address {
			return Err(ProgramError::InvalidAccountData);
		}

		return Ok(());
	}

	ctx.log("Create");

	let space = TokenAccount::LEN as u64;
	let lamports = ctx.rent().minimum_balance(TokenAccount::LEN);
	let token_program_id = token::ID;
	let bump = [bump];
	let seeds: &[&[u8]] = &[
		wallet.address.as_ref(),
		token_program_id.as_ref(),
		mint.address.as_ref(),
		&bump,
	];

	ctx.invoke_signed(
		&system::create_account(
			&payer.address,
			&associated.address,
			lamports,
			space,
			&token::ID,
		),
		&[seeds],
	)?;

	ctx.invoke(&token::instruction::initialize_account3(
		&associated.address,
		&mint.address,
		&wallet.address,
	))
}
