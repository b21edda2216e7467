use crate::raffle_error::RaffleError;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{clock::UnixTimestamp, pubkey::Pubkey};
use std::collections::HashMap;
use std::convert::TryFrom;

/// Shortest raffle a creator may open (1 hour)
pub const MIN_DURATION: u64 = 60 * 60;
/// Longest raffle a creator may open (30 days)
pub const MAX_DURATION: u64 = 30 * 24 * 60 * 60;
/// Share of every drawn prize pool kept by the house, in percent
pub const TREASURY_FEE_PERCENT: u64 = 10;

/// Status of a raffle
///
/// "Ended" is never stored: it is `now >= end_timestamp` evaluated at call time.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaffleStatus {
    /// Open for ticket sales until its end timestamp
    Active,
    /// Reserved; no operation stores it
    Ended,
    /// Winner chosen and prize pool resolved (terminal)
    Drawn,
    /// Reserved terminal state
    Cancelled,
}

impl TryFrom<u8> for RaffleStatus {
    type Error = &'static str;

    fn try_from(val: u8) -> Result<Self, Self::Error> {
        match val {
            0 => Ok(RaffleStatus::Active),
            1 => Ok(RaffleStatus::Ended),
            2 => Ok(RaffleStatus::Drawn),
            3 => Ok(RaffleStatus::Cancelled),
            _ => Err("Invalid raffle status"),
        }
    }
}

impl From<RaffleStatus> for u8 {
    fn from(status: RaffleStatus) -> Self {
        match status {
            RaffleStatus::Active => 0,
            RaffleStatus::Ended => 1,
            RaffleStatus::Drawn => 2,
            RaffleStatus::Cancelled => 3,
        }
    }
}

/// Raffle record
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Raffle {
    /// Sequential id, never reused
    pub id: u64,
    /// Price per ticket in the smallest currency unit
    pub ticket_price: u64,
    /// Cap on tickets any single holder may own in this raffle
    pub max_tickets_per_user: u64,
    /// End of the sale window (Unix timestamp)
    pub end_timestamp: UnixTimestamp,
    /// Total tickets sold
    pub total_tickets_sold: u64,
    /// Collected payments earmarked for the winner
    pub prize_pool: u64,
    /// Winner, set once drawn
    pub winner: Option<Pubkey>,
    /// Stored status
    pub status: RaffleStatus,
    /// Creation time (Unix timestamp)
    pub created_at: UnixTimestamp,
}

impl Raffle {
    pub fn has_ended(&self, now: UnixTimestamp) -> bool {
        now >= self.end_timestamp
    }

    /// Stored Active and still inside the sale window
    pub fn is_live(&self, now: UnixTimestamp) -> bool {
        self.status == RaffleStatus::Active && !self.has_ended(now)
    }
}

/// Ticket ownership for one raffle
///
/// Holders are kept in the order of their first purchase; that order defines
/// the contiguous ticket ranges the draw walks.
#[derive(Clone, Debug, Default)]
pub struct TicketBook {
    holders: Vec<Pubkey>,
    counts: HashMap<Pubkey, u64>,
}

impl TicketBook {
    pub fn tickets_of(&self, holder: &Pubkey) -> u64 {
        self.counts.get(holder).copied().unwrap_or(0)
    }

    /// Adds `quantity` to `holder`, registering it on first purchase.
    /// Returns the holder's new count.
    pub fn credit(&mut self, holder: &Pubkey, quantity: u64) -> Result<u64, RaffleError> {
        let owned = self.tickets_of(holder);
        let count = owned
            .checked_add(quantity)
            .ok_or(RaffleError::ArithmeticOverflow)?;
        if count == 0 {
            return Ok(0);
        }
        if owned == 0 {
            self.holders.push(*holder);
        }
        self.counts.insert(*holder, count);
        Ok(count)
    }

    /// Holders with their counts, first-purchase order
    pub fn participants(&self) -> Vec<(Pubkey, u64)> {
        self.holders
            .iter()
            .map(|holder| (*holder, self.tickets_of(holder)))
            .collect()
    }

    /// Running ticket totals, one per holder in first-purchase order.
    /// Holder `i` owns the tickets `[prefix[i - 1], prefix[i])`.
    pub fn cumulative_ranges(&self) -> Vec<(Pubkey, u64)> {
        let mut running = 0u64;
        self.holders
            .iter()
            .map(|holder| {
                running += self.tickets_of(holder);
                (*holder, running)
            })
            .collect()
    }
}

/// Engine-wide configuration
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Operator allowed to create raffles, pause, and withdraw the treasury
    pub owner: Pubkey,
    /// Blocks ticket purchases while set
    pub paused: bool,
    /// Last raffle id allocated, zero before the first raffle
    pub raffle_counter: u64,
}

impl Config {
    pub fn new(owner: Pubkey) -> Self {
        Self {
            owner,
            paused: false,
            raffle_counter: 0,
        }
    }

    pub fn is_owner(&self, caller: &Pubkey) -> bool {
        self.owner == *caller
    }
}
