use solana_program::{
    decode_error::DecodeError, msg, program_error::PrintProgramError,
    program_error::ProgramError,
};
use thiserror::Error;

/// Broad grouping of [`RaffleError`] used by callers deciding how to resurface a failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    Authorization,
    Validation,
    Lifecycle,
    Guard,
    Encoding,
    Environment,
}

/// Errors that may be returned by the raffle ledger
///
/// Every error rejects the whole call; nothing is applied before it is raised.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RaffleError {
    /// Caller is not the operator
    #[error("Only the operator can perform this action")]
    Unauthorized,

    /// Zero price, zero cap, zero quantity, duration out of bounds or similar
    #[error("Invalid parameter")]
    InvalidParameter,

    /// Payment below quantity * ticket price
    #[error("Insufficient payment")]
    InsufficientPayment,

    /// Purchase would push the holder over the per-user cap
    #[error("Exceeds max tickets per user")]
    LimitExceeded,

    /// Checked arithmetic failed
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    /// No raffle with the given id
    #[error("Raffle does not exist")]
    NotFound,

    /// Raffle status is not Active
    #[error("Raffle not active")]
    NotActive,

    /// Sale window has closed
    #[error("Raffle has ended")]
    Expired,

    /// Draw attempted before the end timestamp
    #[error("Raffle not ended yet")]
    TooEarly,

    /// Draw attempted with no tickets sold
    #[error("No tickets sold")]
    NoParticipants,

    /// Treasury withdrawal with nothing to withdraw
    #[error("No treasury balance")]
    EmptyBalance,

    /// Ticket sales are paused
    #[error("Ticket sales are paused")]
    Paused,

    /// Unpause requested while not paused
    #[error("Ticket sales are not paused")]
    NotPaused,

    /// Instruction bytes could not be decoded
    #[error("Invalid instruction data")]
    InvalidInstructionData,

    /// Randomness source could not produce a value
    #[error("Randomness unavailable")]
    RandomnessUnavailable,
}

impl RaffleError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RaffleError::Unauthorized => ErrorCategory::Authorization,
            RaffleError::InvalidParameter
            | RaffleError::InsufficientPayment
            | RaffleError::LimitExceeded
            | RaffleError::ArithmeticOverflow => ErrorCategory::Validation,
            RaffleError::NotFound
            | RaffleError::NotActive
            | RaffleError::Expired
            | RaffleError::TooEarly
            | RaffleError::NoParticipants
            | RaffleError::EmptyBalance => ErrorCategory::Lifecycle,
            RaffleError::Paused | RaffleError::NotPaused => ErrorCategory::Guard,
            RaffleError::InvalidInstructionData => ErrorCategory::Encoding,
            RaffleError::RandomnessUnavailable => ErrorCategory::Environment,
        }
    }
}

impl From<RaffleError> for ProgramError {
    fn from(e: RaffleError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for RaffleError {
    fn type_of() -> &'static str {
        "Raffle Error"
    }
}

impl PrintProgramError for RaffleError {
    fn print<E>(&self) {
        msg!(&self.to_string());
    }
}
