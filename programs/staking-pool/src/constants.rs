// PDA Seeds for deterministic address generation

/// Seed for Pool PDAs: ["pool", authority.key(), pool_id]
/// One authority can run several pools side by side under different IDs
pub const POOL_SEED: &[u8] = b"pool";

/// Seed for UserStake PDAs: ["stake", pool.key(), staker.key()]
/// One stake record per staker per pool
pub const STAKE_SEED: &[u8] = b"stake";

/// Seed for Stake Vault PDAs: ["stake_vault", pool.key()]
/// Token account that custodies all staked tokens of a pool
pub const STAKE_VAULT_SEED: &[u8] = b"stake_vault";

/// Seed for Reward Vault PDAs: ["reward_vault", pool.key()]
/// Token account paying out rewards when the pool runs from a treasury
pub const REWARD_VAULT_SEED: &[u8] = b"reward_vault";

// Account Space Constants

/// Anchor discriminator size (8 bytes)
pub const DISCRIMINATOR_SIZE: usize = 8;

// Pool Configuration Limits

/// Maximum reward rate, in reward units per staked unit per second
/// Keeps `amount * rate * elapsed` comfortably inside u128 for any u64 stake
pub const MAX_REWARD_RATE: u64 = 1_000_000_000;

// Time Constants

pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Check if a reward rate is acceptable for a pool.
/// Zero is allowed: a pool may start without emissions and be adjusted later.
pub fn is_valid_reward_rate(rate: u64) -> bool {
    rate <= MAX_REWARD_RATE
}

/// Check if a stake or unstake amount is acceptable
pub fn is_valid_amount(amount: u64) -> bool {
    amount > 0
}
