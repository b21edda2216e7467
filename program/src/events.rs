//! Events emitted by the raffle ledger for off-chain indexing.
//!
//! Each successful mutating call emits its events after all of its state is
//! committed; a rejected call emits nothing.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{clock::UnixTimestamp, pubkey::Pubkey};

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum RaffleEvent {
    /// Emitted when the operator opens a raffle.
    RaffleCreated {
        raffle_id: u64,
        ticket_price: u64,
        max_tickets_per_user: u64,
        end_timestamp: UnixTimestamp,
    },
    /// Emitted when tickets are bought.
    TicketsPurchased {
        raffle_id: u64,
        buyer: Pubkey,
        quantity: u64,
        /// Amount kept by the ledger, excluding any refund.
        amount_charged: u64,
    },
    /// Emitted when a winner is drawn.
    WinnerDrawn {
        raffle_id: u64,
        winner: Pubkey,
        prize_amount: u64,
    },
    /// Emitted alongside `WinnerDrawn`; the prize is pushed to the winner
    /// in the same call.
    PrizeClaimed {
        raffle_id: u64,
        winner: Pubkey,
        prize_amount: u64,
    },
    /// Emitted when the operator drains the treasury.
    TreasuryWithdrawn { operator: Pubkey, amount: u64 },
    Paused { account: Pubkey },
    Unpaused { account: Pubkey },
    OwnershipTransferred {
        previous_owner: Pubkey,
        new_owner: Pubkey,
    },
}

/// Receiver of ledger events
pub trait EventSink {
    fn emit(&mut self, event: RaffleEvent);
}

/// In-memory event sink, the engine default
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<RaffleEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RaffleEvent] {
        &self.events
    }

    /// Hands over everything recorded so far and empties the log
    pub fn drain(&mut self) -> Vec<RaffleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&RaffleEvent> {
        self.events.last()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: RaffleEvent) {
        self.events.push(event);
    }
}
