#![allow(unexpected_cfgs, deprecated)]

use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;

pub use instructions::*;
pub use state::*;

declare_id!("Cguyo4nag1xDbD9a8uroZF6AdVUhiNnrJd1M3fnNh7P4");

#[program]
pub mod staking_pool {
    use super::*;

    /// Create a pool with the given reward rate and payout source.
    /// The signer becomes the pool authority.
    pub fn initialize(
        ctx: Context<Initialize>,
        pool_id: u64,
        reward_rate: u64,
        reward_source: RewardSource,
    ) -> Result<()> {
        ctx.accounts
            .initialize(pool_id, reward_rate, reward_source, &ctx.bumps)
    }

    /// Stake tokens into a pool
    pub fn stake(ctx: Context<Stake>, amount: u64) -> Result<()> {
        ctx.accounts.stake(amount, &ctx.bumps)
    }

    /// Pay out rewards accrued since the last claim
    pub fn claim_rewards(ctx: Context<ClaimRewards>) -> Result<()> {
        ctx.accounts.claim_rewards()
    }

    /// Withdraw staked tokens; accrued rewards stay claimable
    pub fn unstake(ctx: Context<Unstake>, amount: u64) -> Result<()> {
        ctx.accounts.unstake(amount)
    }

    /// Change the reward rate (pool authority only)
    pub fn adjust_reward_rate(ctx: Context<AdjustRewardRate>, new_rate: u64) -> Result<()> {
        ctx.accounts.adjust_reward_rate(new_rate)
    }
}
