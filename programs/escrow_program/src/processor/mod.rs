mod make_offer;
mod take_offer;

pub use make_offer::MakeOfferAccounts;
use swap_ledger::AccountMeta;
use swap_ledger::InvokeContext;
use swap_ledger::ProgramError;
use swap_ledger::ProgramResult;
pub use take_offer::TakeOfferAccounts;

use crate::ID;
use crate::instruction::EscrowInstruction;

/// Dispatch an escrow instruction.
pub fn process_instruction(
	ctx: &mut InvokeContext<'_>,
	accounts: &[AccountMeta],
	data: &[u8],
) -> ProgramResult {
	if ctx.program_id()? != ID {
		return Err(ProgramError::IncorrectProgramId);
	}

	match EscrowInstruction::unpack(data)? {
		EscrowInstruction::MakeOffer {
			id,
			offered_amount_a,
			wanted_amount_b,
		} => {
			ctx.log("Instruction: MakeOffer");
			MakeOfferAccounts::try_from(accounts)?.process(ctx, id, offered_amount_a, wanted_amount_b)
		}
		EscrowInstruction::TakeOffer => {
			ctx.log("Instruction: TakeOffer");
			TakeOfferAccounts::try_from(accounts)?.process(ctx)
		}
	}
}
