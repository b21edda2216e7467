// Raffle Ledger
// Ticket sales, prize-pool accounting, winner draws and the house treasury,
// run as a deterministic state machine

// Core modules
pub mod raffle_error;
pub mod raffle_state;
pub mod utils;

// Ledger operations and their encoded call surface
pub mod processor;
pub mod raffle_instruction;
pub mod raffle_processor;

// Events for indexers
pub mod events;

// Randomness for winner draws
pub mod vrf;

// Mutex-guarded handle for multi-caller services
pub mod shared;

pub use events::{EventLog, EventSink, RaffleEvent};
pub use processor::{ProcessOutcome, Processor};
pub use raffle_error::{ErrorCategory, RaffleError};
pub use raffle_processor::{DrawOutcome, PurchaseReceipt, RaffleEngine};
pub use raffle_state::{Raffle, RaffleStatus};
pub use shared::SharedRaffleEngine;
pub use vrf::{ChainEntropy, OsRandomness, RandomnessSource};
