use anchor_lang::prelude::*;

use crate::state::RewardSource;

// Events emitted for off-chain indexers, one per state-changing instruction

#[event]
pub struct PoolInitialized {
    pub pool: Pubkey,
    pub authority: Pubkey,
    pub pool_id: u64,
    pub reward_rate: u64,
    pub reward_source: RewardSource,
    pub timestamp: i64,
}

#[event]
pub struct Staked {
    pub pool: Pubkey,
    pub staker: Pubkey,
    pub amount: u64,
    pub amount_staked: u64,
    pub total_staked: u64,
    pub timestamp: i64,
}

#[event]
pub struct RewardsClaimed {
    pub pool: Pubkey,
    pub staker: Pubkey,
    pub reward: u64,
    pub timestamp: i64,
}

#[event]
pub struct Unstaked {
    pub pool: Pubkey,
    pub staker: Pubkey,
    pub amount: u64,
    pub amount_staked: u64,
    pub total_staked: u64,
    pub timestamp: i64,
}

#[event]
pub struct RewardRateAdjusted {
    pub pool: Pubkey,
    pub old_rate: u64,
    pub new_rate: u64,
    pub timestamp: i64,
}
