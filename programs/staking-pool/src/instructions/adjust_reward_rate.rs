use anchor_lang::prelude::*;

use crate::{error::StakingError, events::RewardRateAdjusted, state::Pool};

/// Change the pool's reward rate (pool authority only)
#[derive(Accounts)]
pub struct AdjustRewardRate<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        has_one = authority @ StakingError::UnauthorizedPoolAuthority,
        constraint = pool.is_initialized @ StakingError::PoolNotInitialized,
    )]
    pub pool: Account<'info, Pool>,
}

impl<'info> AdjustRewardRate<'info> {
    /// Rewards accrue lazily, so the new rate also prices every
    /// accrual window that has not been settled yet.
    pub fn adjust_reward_rate(&mut self, new_rate: u64) -> Result<()> {
        let current_time = Clock::get()?.unix_timestamp;
        let old_rate = self.pool.reward_rate;

        self.pool.set_reward_rate(new_rate)?;

        msg!(
            "Reward rate adjusted: pool={}, {} -> {}",
            self.pool.key(),
            old_rate,
            new_rate
        );

        emit!(RewardRateAdjusted {
            pool: self.pool.key(),
            old_rate,
            new_rate,
            timestamp: current_time,
        });

        Ok(())
    }
}
