use crate::raffle_error::RaffleError;
use solana_program::{msg, pubkey::Pubkey};
use std::convert::TryInto;
use std::mem::size_of;

/// Encoded call surface of the raffle ledger
///
/// The calling identity and the current time travel outside the payload;
/// see `Processor::process`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RaffleInstruction {
    /// Open a new raffle (operator only)
    CreateRaffle {
        /// Price per ticket in the smallest currency unit
        ticket_price: u64,
        /// Cap on tickets per holder
        max_tickets_per_user: u64,
        /// Sale window in seconds
        duration: u64,
    },

    /// Buy tickets; `payment` above the cost is refunded
    BuyTickets {
        raffle_id: u64,
        quantity: u64,
        payment: u64,
    },

    /// Draw the winner of an ended raffle (anyone)
    DrawWinner { raffle_id: u64 },

    /// Empty the treasury (operator only)
    WithdrawTreasury,

    /// Stop ticket sales (operator only)
    Pause,

    /// Resume ticket sales (operator only)
    Unpause,

    /// Hand the operator role over (operator only)
    TransferOwnership { new_owner: Pubkey },
}

impl RaffleInstruction {
    /// Unpacks a byte buffer into a RaffleInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, RaffleError> {
        let (tag, rest) = input
            .split_first()
            .ok_or(RaffleError::InvalidInstructionData)?;

        let (instruction, rest) = match tag {
            0 => {
                let (ticket_price, rest) = Self::unpack_u64(rest)?;
                let (max_tickets_per_user, rest) = Self::unpack_u64(rest)?;
                let (duration, rest) = Self::unpack_u64(rest)?;
                (
                    Self::CreateRaffle {
                        ticket_price,
                        max_tickets_per_user,
                        duration,
                    },
                    rest,
                )
            }
            1 => {
                let (raffle_id, rest) = Self::unpack_u64(rest)?;
                let (quantity, rest) = Self::unpack_u64(rest)?;
                let (payment, rest) = Self::unpack_u64(rest)?;
                (
                    Self::BuyTickets {
                        raffle_id,
                        quantity,
                        payment,
                    },
                    rest,
                )
            }
            2 => {
                let (raffle_id, rest) = Self::unpack_u64(rest)?;
                (Self::DrawWinner { raffle_id }, rest)
            }
            3 => (Self::WithdrawTreasury, rest),
            4 => (Self::Pause, rest),
            5 => (Self::Unpause, rest),
            6 => {
                let (new_owner, rest) = Self::unpack_pubkey(rest)?;
                (Self::TransferOwnership { new_owner }, rest)
            }
            _ => return Err(RaffleError::InvalidInstructionData),
        };

        if !rest.is_empty() {
            msg!("Instruction carries {} trailing bytes", rest.len());
            return Err(RaffleError::InvalidInstructionData);
        }

        Ok(instruction)
    }

    /// Packs a RaffleInstruction into a byte buffer
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(size_of::<Self>());
        match *self {
            Self::CreateRaffle {
                ticket_price,
                max_tickets_per_user,
                duration,
            } => {
                buf.push(0);
                buf.extend_from_slice(&ticket_price.to_le_bytes());
                buf.extend_from_slice(&max_tickets_per_user.to_le_bytes());
                buf.extend_from_slice(&duration.to_le_bytes());
            }
            Self::BuyTickets {
                raffle_id,
                quantity,
                payment,
            } => {
                buf.push(1);
                buf.extend_from_slice(&raffle_id.to_le_bytes());
                buf.extend_from_slice(&quantity.to_le_bytes());
                buf.extend_from_slice(&payment.to_le_bytes());
            }
            Self::DrawWinner { raffle_id } => {
                buf.push(2);
                buf.extend_from_slice(&raffle_id.to_le_bytes());
            }
            Self::WithdrawTreasury => buf.push(3),
            Self::Pause => buf.push(4),
            Self::Unpause => buf.push(5),
            Self::TransferOwnership { ref new_owner } => {
                buf.push(6);
                buf.extend_from_slice(new_owner.as_ref());
            }
        }
        buf
    }

    fn unpack_u64(input: &[u8]) -> Result<(u64, &[u8]), RaffleError> {
        if input.len() < 8 {
            return Err(RaffleError::InvalidInstructionData);
        }
        let (value, rest) = input.split_at(8);
        let value = value
            .try_into()
            .map(u64::from_le_bytes)
            .map_err(|_| RaffleError::InvalidInstructionData)?;
        Ok((value, rest))
    }

    fn unpack_pubkey(input: &[u8]) -> Result<(Pubkey, &[u8]), RaffleError> {
        if input.len() < 32 {
            return Err(RaffleError::InvalidInstructionData);
        }
        let (key, rest) = input.split_at(32);
        let key = key
            .try_into()
            .map(Pubkey::new_from_array)
            .map_err(|_| RaffleError::InvalidInstructionData)?;
        Ok((key, rest))
    }
}

/// Create a create_raffle instruction
pub fn create_raffle(ticket_price: u64, max_tickets_per_user: u64, duration: u64) -> Vec<u8> {
    RaffleInstruction::CreateRaffle {
        ticket_price,
        max_tickets_per_user,
        duration,
    }
    .pack()
}

/// Create a buy_tickets instruction
pub fn buy_tickets(raffle_id: u64, quantity: u64, payment: u64) -> Vec<u8> {
    RaffleInstruction::BuyTickets {
        raffle_id,
        quantity,
        payment,
    }
    .pack()
}

/// Create a draw_winner instruction
pub fn draw_winner(raffle_id: u64) -> Vec<u8> {
    RaffleInstruction::DrawWinner { raffle_id }.pack()
}

/// Create a withdraw_treasury instruction
pub fn withdraw_treasury() -> Vec<u8> {
    RaffleInstruction::WithdrawTreasury.pack()
}
