use crate::events::{EventLog, EventSink, RaffleEvent};
use crate::raffle_error::RaffleError;
use crate::raffle_state::{
    Config, Raffle, RaffleStatus, TicketBook, MAX_DURATION, MIN_DURATION, TREASURY_FEE_PERCENT,
};
use crate::utils;
use crate::vrf::{self, RandomnessSource};

use solana_program::{clock::UnixTimestamp, msg, pubkey::Pubkey};
use std::collections::{BTreeMap, HashMap};

/// Result of a successful ticket purchase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub tickets_issued: u64,
    /// Overpayment the caller must hand back to the buyer
    pub refund_amount: u64,
}

/// Result of a successful draw
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawOutcome {
    pub winner: Pubkey,
    /// Amount the caller must pay out to the winner
    pub prize_amount: u64,
    /// Amount moved into the treasury
    pub treasury_fee: u64,
}

/// The raffle ledger: every raffle, every ticket record and the treasury.
///
/// Each method is one atomic call. All checks run before the first write, so
/// a rejected call leaves the ledger untouched and emits no event.
pub struct RaffleEngine<S: EventSink = EventLog> {
    config: Config,
    raffles: BTreeMap<u64, Raffle>,
    tickets: HashMap<u64, TicketBook>,
    user_raffles: HashMap<Pubkey, Vec<u64>>,
    treasury_balance: u64,
    sink: S,
}

impl RaffleEngine<EventLog> {
    pub fn new(owner: Pubkey) -> Self {
        Self::with_sink(owner, EventLog::new())
    }
}

impl<S: EventSink> RaffleEngine<S> {
    pub fn with_sink(owner: Pubkey, sink: S) -> Self {
        Self {
            config: Config::new(owner),
            raffles: BTreeMap::new(),
            tickets: HashMap::new(),
            user_raffles: HashMap::new(),
            treasury_balance: 0,
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn require_owner(&self, caller: &Pubkey) -> Result<(), RaffleError> {
        if !self.config.is_owner(caller) {
            msg!("Caller {} is not the operator", caller);
            return Err(RaffleError::Unauthorized);
        }
        Ok(())
    }

    /// Opens a raffle. Operator only.
    ///
    /// `duration` must lie in `[MIN_DURATION, MAX_DURATION]` seconds.
    pub fn create_raffle(
        &mut self,
        caller: &Pubkey,
        ticket_price: u64,
        max_tickets_per_user: u64,
        duration: u64,
        now: UnixTimestamp,
    ) -> Result<u64, RaffleError> {
        self.require_owner(caller)?;

        if ticket_price == 0 {
            msg!("Ticket price must be greater than 0");
            return Err(RaffleError::InvalidParameter);
        }
        if max_tickets_per_user == 0 {
            msg!("Max tickets must be greater than 0");
            return Err(RaffleError::InvalidParameter);
        }
        if duration < MIN_DURATION {
            msg!("Duration too short: {} < {}", duration, MIN_DURATION);
            return Err(RaffleError::InvalidParameter);
        }
        if duration > MAX_DURATION {
            msg!("Duration too long: {} > {}", duration, MAX_DURATION);
            return Err(RaffleError::InvalidParameter);
        }

        // duration <= MAX_DURATION, so the cast is lossless
        let end_timestamp = now
            .checked_add(duration as i64)
            .ok_or(RaffleError::ArithmeticOverflow)?;
        let raffle_id = self
            .config
            .raffle_counter
            .checked_add(1)
            .ok_or(RaffleError::ArithmeticOverflow)?;

        self.config.raffle_counter = raffle_id;
        self.raffles.insert(
            raffle_id,
            Raffle {
                id: raffle_id,
                ticket_price,
                max_tickets_per_user,
                end_timestamp,
                total_tickets_sold: 0,
                prize_pool: 0,
                winner: None,
                status: RaffleStatus::Active,
                created_at: now,
            },
        );
        self.tickets.insert(raffle_id, TicketBook::default());

        msg!(
            "Raffle {} created: price={}, max per user={}, ends at {}",
            raffle_id,
            ticket_price,
            max_tickets_per_user,
            end_timestamp
        );
        self.sink.emit(RaffleEvent::RaffleCreated {
            raffle_id,
            ticket_price,
            max_tickets_per_user,
            end_timestamp,
        });

        Ok(raffle_id)
    }

    /// Sells `quantity` tickets to `buyer` against `payment`.
    ///
    /// The ledger keeps exactly `quantity * ticket_price`; the returned
    /// refund is the rest of `payment`.
    pub fn buy_tickets(
        &mut self,
        buyer: &Pubkey,
        raffle_id: u64,
        quantity: u64,
        payment: u64,
        now: UnixTimestamp,
    ) -> Result<PurchaseReceipt, RaffleError> {
        if self.config.paused {
            msg!("Ticket sales are paused");
            return Err(RaffleError::Paused);
        }

        let raffle = self.raffles.get(&raffle_id).ok_or_else(|| {
            msg!("Raffle {} does not exist", raffle_id);
            RaffleError::NotFound
        })?;

        if raffle.status != RaffleStatus::Active {
            msg!("Raffle {} is not active", raffle_id);
            return Err(RaffleError::NotActive);
        }
        if raffle.has_ended(now) {
            msg!("Raffle {} has ended at {}", raffle_id, raffle.end_timestamp);
            return Err(RaffleError::Expired);
        }
        if quantity == 0 {
            msg!("Must buy at least 1 ticket");
            return Err(RaffleError::InvalidParameter);
        }

        let owned = self
            .tickets
            .get(&raffle_id)
            .map(|book| book.tickets_of(buyer))
            .unwrap_or(0);
        let new_owned = owned
            .checked_add(quantity)
            .filter(|total| *total <= raffle.max_tickets_per_user)
            .ok_or_else(|| {
                msg!(
                    "Exceeds max tickets per user: owns {}, requested {}, cap {}",
                    owned,
                    quantity,
                    raffle.max_tickets_per_user
                );
                RaffleError::LimitExceeded
            })?;

        let amount_charged = quantity
            .checked_mul(raffle.ticket_price)
            .ok_or(RaffleError::ArithmeticOverflow)?;
        if payment < amount_charged {
            msg!(
                "Insufficient payment: needed {}, got {}",
                amount_charged,
                payment
            );
            return Err(RaffleError::InsufficientPayment);
        }
        let refund_amount = payment - amount_charged;

        let total_tickets_sold = raffle
            .total_tickets_sold
            .checked_add(quantity)
            .ok_or(RaffleError::ArithmeticOverflow)?;
        let prize_pool = raffle
            .prize_pool
            .checked_add(amount_charged)
            .ok_or(RaffleError::ArithmeticOverflow)?;

        // Everything validated; commit
        let book = self.tickets.entry(raffle_id).or_default();
        let credited = book.credit(buyer, quantity)?;
        debug_assert_eq!(credited, new_owned);
        if owned == 0 {
            self.user_raffles.entry(*buyer).or_default().push(raffle_id);
        }
        if let Some(raffle) = self.raffles.get_mut(&raffle_id) {
            raffle.total_tickets_sold = total_tickets_sold;
            raffle.prize_pool = prize_pool;
        }

        msg!(
            "Purchased {} tickets in raffle {} for {} (refund {})",
            quantity,
            raffle_id,
            amount_charged,
            refund_amount
        );
        self.sink.emit(RaffleEvent::TicketsPurchased {
            raffle_id,
            buyer: *buyer,
            quantity,
            amount_charged,
        });

        Ok(PurchaseReceipt {
            tickets_issued: quantity,
            refund_amount,
        })
    }

    /// Draws the winner of an ended raffle and resolves its prize pool.
    ///
    /// Anyone may call this. `randomness` is consulted once, after every
    /// other check has passed.
    pub fn draw_winner<R: RandomnessSource + ?Sized>(
        &mut self,
        raffle_id: u64,
        now: UnixTimestamp,
        randomness: &mut R,
    ) -> Result<DrawOutcome, RaffleError> {
        let raffle = self.raffles.get(&raffle_id).ok_or_else(|| {
            msg!("Raffle {} does not exist", raffle_id);
            RaffleError::NotFound
        })?;

        if raffle.status != RaffleStatus::Active {
            msg!("Raffle {} is not active", raffle_id);
            return Err(RaffleError::NotActive);
        }
        if !raffle.has_ended(now) {
            msg!(
                "Raffle {} not ended yet: now {}, ends at {}",
                raffle_id,
                now,
                raffle.end_timestamp
            );
            return Err(RaffleError::TooEarly);
        }
        if raffle.total_tickets_sold == 0 {
            msg!("No tickets sold in raffle {}", raffle_id);
            return Err(RaffleError::NoParticipants);
        }

        let (prize_amount, treasury_fee) =
            utils::split_prize_pool(raffle.prize_pool, TREASURY_FEE_PERCENT)?;
        let treasury_balance = self
            .treasury_balance
            .checked_add(treasury_fee)
            .ok_or(RaffleError::ArithmeticOverflow)?;

        let random_bytes = randomness.random_bytes()?;
        let winning_index = vrf::get_random_winner_index(&random_bytes, raffle.total_tickets_sold);
        let ranges = self
            .tickets
            .get(&raffle_id)
            .map(TicketBook::cumulative_ranges)
            .unwrap_or_default();
        let winner = vrf::select_winner(&ranges, winning_index).ok_or_else(|| {
            msg!("Ticket {} has no holder in raffle {}", winning_index, raffle_id);
            RaffleError::NoParticipants
        })?;

        self.treasury_balance = treasury_balance;
        if let Some(raffle) = self.raffles.get_mut(&raffle_id) {
            raffle.status = RaffleStatus::Drawn;
            raffle.winner = Some(winner);
        }

        msg!(
            "Raffle {} drawn: ticket {} won by {}, prize {}, fee {}",
            raffle_id,
            winning_index,
            winner,
            prize_amount,
            treasury_fee
        );
        self.sink.emit(RaffleEvent::WinnerDrawn {
            raffle_id,
            winner,
            prize_amount,
        });
        self.sink.emit(RaffleEvent::PrizeClaimed {
            raffle_id,
            winner,
            prize_amount,
        });

        Ok(DrawOutcome {
            winner,
            prize_amount,
            treasury_fee,
        })
    }

    /// Empties the treasury. Operator only. Returns the amount to pay out.
    pub fn withdraw_treasury(&mut self, caller: &Pubkey) -> Result<u64, RaffleError> {
        self.require_owner(caller)?;

        if self.treasury_balance == 0 {
            msg!("No treasury balance");
            return Err(RaffleError::EmptyBalance);
        }

        let amount = std::mem::take(&mut self.treasury_balance);

        msg!("Treasury withdrawn by {}: {}", caller, amount);
        self.sink.emit(RaffleEvent::TreasuryWithdrawn {
            operator: *caller,
            amount,
        });

        Ok(amount)
    }

    /// Stops ticket sales. Operator only.
    pub fn pause(&mut self, caller: &Pubkey) -> Result<(), RaffleError> {
        self.require_owner(caller)?;
        if self.config.paused {
            msg!("Already paused");
            return Err(RaffleError::Paused);
        }

        self.config.paused = true;

        msg!("Ticket sales paused by {}", caller);
        self.sink.emit(RaffleEvent::Paused { account: *caller });
        Ok(())
    }

    /// Resumes ticket sales. Operator only.
    pub fn unpause(&mut self, caller: &Pubkey) -> Result<(), RaffleError> {
        self.require_owner(caller)?;
        if !self.config.paused {
            msg!("Not paused");
            return Err(RaffleError::NotPaused);
        }

        self.config.paused = false;

        msg!("Ticket sales resumed by {}", caller);
        self.sink.emit(RaffleEvent::Unpaused { account: *caller });
        Ok(())
    }

    /// Hands the operator role to `new_owner`. Operator only.
    pub fn transfer_ownership(
        &mut self,
        caller: &Pubkey,
        new_owner: &Pubkey,
    ) -> Result<(), RaffleError> {
        self.require_owner(caller)?;
        if *new_owner == Pubkey::default() {
            msg!("New owner cannot be the default address");
            return Err(RaffleError::InvalidParameter);
        }

        let previous_owner = self.config.owner;
        self.config.owner = *new_owner;

        msg!("Operator updated from {} to {}", previous_owner, new_owner);
        self.sink.emit(RaffleEvent::OwnershipTransferred {
            previous_owner,
            new_owner: *new_owner,
        });
        Ok(())
    }

    pub fn owner(&self) -> Pubkey {
        self.config.owner
    }

    pub fn is_paused(&self) -> bool {
        self.config.paused
    }

    /// Number of raffles created so far (also the latest id)
    pub fn raffle_counter(&self) -> u64 {
        self.config.raffle_counter
    }

    pub fn treasury_balance(&self) -> u64 {
        self.treasury_balance
    }

    pub fn get_raffle(&self, raffle_id: u64) -> Result<&Raffle, RaffleError> {
        self.raffles.get(&raffle_id).ok_or(RaffleError::NotFound)
    }

    /// Tickets `holder` owns in `raffle_id`; zero for unknown raffles or holders
    pub fn get_user_tickets(&self, raffle_id: u64, holder: &Pubkey) -> u64 {
        self.tickets
            .get(&raffle_id)
            .map(|book| book.tickets_of(holder))
            .unwrap_or(0)
    }

    /// Ids of raffles whose stored status is Active, expired or not
    pub fn get_active_raffles(&self) -> Vec<u64> {
        self.raffles
            .values()
            .filter(|raffle| raffle.status == RaffleStatus::Active)
            .map(|raffle| raffle.id)
            .collect()
    }

    pub fn is_raffle_active(&self, raffle_id: u64, now: UnixTimestamp) -> bool {
        self.raffles
            .get(&raffle_id)
            .map(|raffle| raffle.is_live(now))
            .unwrap_or(false)
    }

    pub fn get_time_remaining(&self, raffle_id: u64, now: UnixTimestamp) -> Result<u64, RaffleError> {
        let raffle = self.get_raffle(raffle_id)?;
        Ok(utils::time_remaining(raffle.end_timestamp, now))
    }

    /// Raffles `holder` has bought into, in order of first purchase
    pub fn get_user_raffles(&self, holder: &Pubkey) -> Vec<u64> {
        self.user_raffles.get(holder).cloned().unwrap_or_default()
    }

    /// Holders and their ticket counts in first-purchase order
    pub fn get_participants(&self, raffle_id: u64) -> Result<Vec<(Pubkey, u64)>, RaffleError> {
        self.get_raffle(raffle_id)?;
        Ok(self
            .tickets
            .get(&raffle_id)
            .map(TicketBook::participants)
            .unwrap_or_default())
    }
}
