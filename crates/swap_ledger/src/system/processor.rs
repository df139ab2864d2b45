use super::ID;
use super::MAX_PERMITTED_DATA_LENGTH;
use super::SystemError;
use super::SystemInstruction;
use crate::AccountInfoValidation;
use crate::AccountMeta;
use crate::Address;
use crate::InvokeContext;
use crate::Program;
use crate::ProgramError;
use crate::ProgramResult;
use crate::log;

pub struct SystemProgram;

impl Program for SystemProgram {
	fn id(&self) -> Address {
		ID
	}

	fn process(
		&self,
		ctx: &mut InvokeContext<'_>,
		accounts: &[AccountMeta],
		data: &[u8],
	) -> ProgramResult {
		match SystemInstruction::unpack(data)? {
			SystemInstruction::CreateAccount {
				lamports,
				space,
				owner,
			} => process_create_account(ctx, accounts, lamports, space, &owner),
			SystemInstruction::Transfer { lamports } => process_transfer(ctx, accounts, lamports),
		}
	}
}

fn process_create_account(
	ctx: &mut InvokeContext<'_>,
	accounts: &[AccountMeta],
	lamports: u64,
	space: u64,
	owner: &Address,
) -> ProgramResult {
	let [from, to, ..] = accounts else {
		return Err(ProgramError::NotEnoughAccountKeys);
	};

	ctx.view(from)?.assert_signer()?.assert_writable()?;
	ctx.view(to)?.assert_signer()?.assert_writable()?;

	let target = ctx.account(&to.address)?;
	if target.lamports > 0 || !target.data.is_empty() || target.owner != ID {
		log!("Create Account: account {} already in use", to.address.as_ref());
		return Err(SystemError::AccountAlreadyInUse.into());
	}

	if space > MAX_PERMITTED_DATA_LENGTH {
		return Err(SystemError::InvalidAccountDataLength.into());
	}
	let space = usize::try_from(space).map_err(|_| SystemError::InvalidAccountDataLength)?;

	debit(ctx, &from.address, lamports)?;

	let account = ctx.account_mut(&to.address)?;
	account.lamports = lamports;
	account.data = vec![0; space];
	account.owner = *owner;

	Ok(())
}

fn process_transfer(
	ctx: &mut InvokeContext<'_>,
	accounts: &[AccountMeta],
	lamports: u64,
) -> ProgramResult {
	let [from, to, ..] = accounts else {
		return Err(ProgramError::NotEnoughAccountKeys);
	};

	ctx.view(from)?.assert_signer()?.assert_writable()?;
	ctx.view(to)?.assert_writable()?;

	debit(ctx, &from.address, lamports)?;

	let account = ctx.account_mut(&to.address)?;
	account.lamports = account
		.lamports
		.checked_add(lamports)
		.ok_or(ProgramError::ArithmeticOverflow)?;

	Ok(())
}

/// Take `lamports` from a system account that carries no data.
fn debit(ctx: &mut InvokeContext<'_>, address: &Address, lamports: u64) -> ProgramResult {
	let account = ctx.account_mut(address)?;

	if !account.data.is_empty() {
		log!("Transfer: `from` must not carry data");
		return Err(ProgramError::InvalidArgument);
	}

	account.lamports = account.lamports.checked_sub(lamports).ok_or_else(|| {
		log!("Transfer: insufficient lamports");
		SystemError::ResultWithNegativeLamports
	})?;

	Ok(())
}
