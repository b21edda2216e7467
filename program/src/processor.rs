use crate::events::EventSink;
use crate::raffle_instruction::RaffleInstruction;
use crate::raffle_processor::{DrawOutcome, PurchaseReceipt, RaffleEngine};
use crate::vrf::RandomnessSource;

use solana_program::{clock::UnixTimestamp, msg, program_error::ProgramError, pubkey::Pubkey};

/// What a processed instruction produced
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessOutcome {
    RaffleCreated { raffle_id: u64 },
    TicketsPurchased(PurchaseReceipt),
    WinnerDrawn(DrawOutcome),
    TreasuryWithdrawn { amount: u64 },
    Paused,
    Unpaused,
    OwnershipTransferred,
}

pub struct Processor;

impl Processor {
    /// Decodes `instruction_data` and runs it against `engine` on behalf of `caller`
    pub fn process<S: EventSink, R: RandomnessSource + ?Sized>(
        engine: &mut RaffleEngine<S>,
        caller: &Pubkey,
        now: UnixTimestamp,
        instruction_data: &[u8],
        randomness: &mut R,
    ) -> Result<ProcessOutcome, ProgramError> {
        let instruction = RaffleInstruction::unpack(instruction_data)?;

        let outcome = match instruction {
            RaffleInstruction::CreateRaffle {
                ticket_price,
                max_tickets_per_user,
                duration,
            } => {
                msg!("Instruction: Create Raffle");
                let raffle_id = engine.create_raffle(
                    caller,
                    ticket_price,
                    max_tickets_per_user,
                    duration,
                    now,
                )?;
                ProcessOutcome::RaffleCreated { raffle_id }
            }
            RaffleInstruction::BuyTickets {
                raffle_id,
                quantity,
                payment,
            } => {
                msg!("Instruction: Buy Tickets");
                let receipt = engine.buy_tickets(caller, raffle_id, quantity, payment, now)?;
                ProcessOutcome::TicketsPurchased(receipt)
            }
            RaffleInstruction::DrawWinner { raffle_id } => {
                msg!("Instruction: Draw Winner");
                let outcome = engine.draw_winner(raffle_id, now, randomness)?;
                ProcessOutcome::WinnerDrawn(outcome)
            }
            RaffleInstruction::WithdrawTreasury => {
                msg!("Instruction: Withdraw Treasury");
                let amount = engine.withdraw_treasury(caller)?;
                ProcessOutcome::TreasuryWithdrawn { amount }
            }
            RaffleInstruction::Pause => {
                msg!("Instruction: Pause");
                engine.pause(caller)?;
                ProcessOutcome::Paused
            }
            RaffleInstruction::Unpause => {
                msg!("Instruction: Unpause");
                engine.unpause(caller)?;
                ProcessOutcome::Unpaused
            }
            RaffleInstruction::TransferOwnership { new_owner } => {
                msg!("Instruction: Transfer Ownership");
                engine.transfer_ownership(caller, &new_owner)?;
                ProcessOutcome::OwnershipTransferred
            }
        };

        Ok(outcome)
    }
}
