// Randomness for winner draws
use crate::raffle_error::RaffleError;
use arrayref::array_ref;
use rand::{rngs::OsRng, RngCore};
use solana_program::{clock::UnixTimestamp, msg, pubkey::Pubkey};

/// Supplies the 32 random bytes consumed by one draw
pub trait RandomnessSource {
    fn random_bytes(&mut self) -> Result<[u8; 32], RaffleError>;
}

/// Operating-system CSPRNG. Use this for real draws.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsRandomness;

impl RandomnessSource for OsRandomness {
    fn random_bytes(&mut self) -> Result<[u8; 32], RaffleError> {
        let mut result = [0u8; 32];
        OsRng.try_fill_bytes(&mut result).map_err(|err| {
            msg!("OS randomness unavailable: {}", err);
            RaffleError::RandomnessUnavailable
        })?;
        Ok(result)
    }
}

/// Block-hash and timestamp composite, the entropy a chain-hosted raffle
/// would read at draw time.
///
/// WEAK: whoever orders transactions or produces the block can steer the
/// outcome. Only for replaying draws that were made this way.
#[derive(Clone, Copy, Debug)]
pub struct ChainEntropy {
    pub block_hash: [u8; 32],
    pub timestamp: UnixTimestamp,
}

impl RandomnessSource for ChainEntropy {
    fn random_bytes(&mut self) -> Result<[u8; 32], RaffleError> {
        let hash_value1 = u64::from_le_bytes(*array_ref![self.block_hash, 0, 8]);
        let hash_value2 = u64::from_le_bytes(*array_ref![self.block_hash, 8, 8]);
        let hash_value3 = u64::from_le_bytes(*array_ref![self.block_hash, 16, 8]);
        let hash_value4 = u64::from_le_bytes(*array_ref![self.block_hash, 24, 8]);

        let mut mixed_value = mix(hash_value1, self.timestamp as u64);
        mixed_value = mix(mixed_value, hash_value2);

        let mut result = [0u8; 32];
        result[0..8].copy_from_slice(&mixed_value.to_le_bytes());
        result[8..16].copy_from_slice(&mix(mixed_value, hash_value3).to_le_bytes());
        result[16..24].copy_from_slice(&mix(mixed_value, hash_value4).to_le_bytes());
        result[24..32].copy_from_slice(&mix(mix(mixed_value, hash_value3), hash_value4).to_le_bytes());
        Ok(result)
    }
}

/// splitmix64 finaliser over the sum of both inputs
fn mix(a: u64, b: u64) -> u64 {
    let mut z = a.wrapping_add(b);

    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Ticket index in `[0, total_tickets)` for a randomness result
pub fn get_random_winner_index(random_bytes: &[u8; 32], total_tickets: u64) -> u64 {
    if total_tickets == 0 {
        return 0;
    }

    let random_value = u64::from_le_bytes(*array_ref![random_bytes, 0, 8]);
    random_value % total_tickets
}

/// Finds the holder owning ticket `index`, given running totals in
/// first-purchase order (see `TicketBook::cumulative_ranges`).
pub fn select_winner(ranges: &[(Pubkey, u64)], index: u64) -> Option<Pubkey> {
    let position = ranges.partition_point(|(_, running_total)| *running_total <= index);
    ranges.get(position).map(|(holder, _)| *holder)
}
