// Raffle ledger - arithmetic helpers
use crate::raffle_error::RaffleError;
use solana_program::clock::UnixTimestamp;

/// Calculate fee amount based on input amount and percentage (floor division)
pub fn calculate_fee(amount: u64, percentage: u64) -> Result<u64, RaffleError> {
    amount
        .checked_mul(percentage)
        .map(|scaled| scaled / 100)
        .ok_or(RaffleError::ArithmeticOverflow)
}

/// Splits a prize pool into `(prize_amount, treasury_fee)`
pub fn split_prize_pool(prize_pool: u64, fee_percentage: u64) -> Result<(u64, u64), RaffleError> {
    let treasury_fee = calculate_fee(prize_pool, fee_percentage)?;
    let prize_amount = prize_pool
        .checked_sub(treasury_fee)
        .ok_or(RaffleError::ArithmeticOverflow)?;
    Ok((prize_amount, treasury_fee))
}

/// Seconds left until `end_timestamp`, zero once it has passed
pub fn time_remaining(end_timestamp: UnixTimestamp, now: UnixTimestamp) -> u64 {
    if now >= end_timestamp {
        return 0;
    }
    end_timestamp.saturating_sub(now) as u64
}
