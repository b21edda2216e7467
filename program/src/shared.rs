//! Thread-safe handle over one [`RaffleEngine`].
//!
//! Every call takes the lock for its whole check-and-commit sequence, so
//! concurrent callers are applied in a single total order: a buyer racing
//! for the last tickets under a cap re-validates against whatever the
//! previous holder of the lock committed.

use crate::events::{EventLog, EventSink, RaffleEvent};
use crate::raffle_error::RaffleError;
use crate::raffle_processor::{DrawOutcome, PurchaseReceipt, RaffleEngine};
use crate::raffle_state::Raffle;
use crate::vrf::RandomnessSource;

use solana_program::{clock::UnixTimestamp, pubkey::Pubkey};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub struct SharedRaffleEngine<S: EventSink = EventLog> {
    inner: Arc<Mutex<RaffleEngine<S>>>,
}

impl<S: EventSink> Clone for SharedRaffleEngine<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SharedRaffleEngine<EventLog> {
    pub fn new(owner: Pubkey) -> Self {
        Self::from_engine(RaffleEngine::new(owner))
    }

    /// Takes every event recorded so far
    pub fn drain_events(&self) -> Vec<RaffleEvent> {
        self.lock().sink_mut().drain()
    }
}

impl<S: EventSink> SharedRaffleEngine<S> {
    pub fn from_engine(engine: RaffleEngine<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    // Recovers the guard of a poisoned lock
    fn lock(&self) -> MutexGuard<'_, RaffleEngine<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access, for multi-step reads or custom calls
    pub fn with_engine<T>(&self, f: impl FnOnce(&mut RaffleEngine<S>) -> T) -> T {
        let mut engine = self.lock();
        f(&mut *engine)
    }

    pub fn create_raffle(
        &self,
        caller: &Pubkey,
        ticket_price: u64,
        max_tickets_per_user: u64,
        duration: u64,
        now: UnixTimestamp,
    ) -> Result<u64, RaffleError> {
        self.lock()
            .create_raffle(caller, ticket_price, max_tickets_per_user, duration, now)
    }

    pub fn buy_tickets(
        &self,
        buyer: &Pubkey,
        raffle_id: u64,
        quantity: u64,
        payment: u64,
        now: UnixTimestamp,
    ) -> Result<PurchaseReceipt, RaffleError> {
        self.lock()
            .buy_tickets(buyer, raffle_id, quantity, payment, now)
    }

    pub fn draw_winner<R: RandomnessSource + ?Sized>(
        &self,
        raffle_id: u64,
        now: UnixTimestamp,
        randomness: &mut R,
    ) -> Result<DrawOutcome, RaffleError> {
        self.lock().draw_winner(raffle_id, now, randomness)
    }

    pub fn withdraw_treasury(&self, caller: &Pubkey) -> Result<u64, RaffleError> {
        self.lock().withdraw_treasury(caller)
    }

    pub fn pause(&self, caller: &Pubkey) -> Result<(), RaffleError> {
        self.lock().pause(caller)
    }

    pub fn unpause(&self, caller: &Pubkey) -> Result<(), RaffleError> {
        self.lock().unpause(caller)
    }

    pub fn get_raffle(&self, raffle_id: u64) -> Result<Raffle, RaffleError> {
        self.lock().get_raffle(raffle_id).cloned()
    }

    pub fn get_user_tickets(&self, raffle_id: u64, holder: &Pubkey) -> u64 {
        self.lock().get_user_tickets(raffle_id, holder)
    }

    pub fn treasury_balance(&self) -> u64 {
        self.lock().treasury_balance()
    }
}
