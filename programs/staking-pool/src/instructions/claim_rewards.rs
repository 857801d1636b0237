use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount, Transfer};

use crate::{
    constants::*,
    error::StakingError,
    events::RewardsClaimed,
    log_error,
    state::{Pool, RewardSource, UserStake},
};

/// Claim accrued rewards without touching the staked balance
#[derive(Accounts)]
pub struct ClaimRewards<'info> {
    /// Must own the stake record
    pub staker: Signer<'info>,

    #[account(
        constraint = pool.is_initialized @ StakingError::PoolNotInitialized,
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        mut,
        constraint = user_stake.pool == pool.key() @ StakingError::StakeNotFound,
        constraint = user_stake.staker == staker.key() @ StakingError::Unauthorized,
    )]
    pub user_stake: Account<'info, UserStake>,

    /// Receives the payout
    #[account(
        mut,
        constraint = user_reward_token_account.mint == pool.reward_mint @ StakingError::InvalidTokenMint,
        constraint = user_reward_token_account.owner == staker.key() @ StakingError::InvalidTokenAccountOwner,
    )]
    pub user_reward_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = reward_mint.key() == pool.reward_mint @ StakingError::InvalidTokenMint,
    )]
    pub reward_mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = reward_vault.key() == pool.reward_vault @ StakingError::InvalidTokenAccount,
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

impl<'info> ClaimRewards<'info> {
    pub fn claim_rewards(&mut self) -> Result<()> {
        let current_time = Clock::get()?.unix_timestamp;

        let reward = preview_claim(&self.user_stake, &self.pool, current_time)?;

        msg!(
            "Claimable rewards: pending={}, amount_staked={}, total={}",
            self.user_stake.pending_rewards,
            self.user_stake.amount_staked,
            reward
        );

        // Pay first: the accrual window only closes once tokens have moved
        if reward > 0 {
            self.pay_out(reward)?;
        } else {
            msg!("No rewards accrued");
        }

        self.user_stake.record_claim(reward, current_time)?;

        msg!(
            "CLAIM EVENT: staker={}, pool={}, reward={}, staking_days={}, total_claimed={}",
            self.staker.key(),
            self.pool.key(),
            reward,
            staking_days(&self.user_stake, current_time),
            self.user_stake.total_claimed
        );

        emit!(RewardsClaimed {
            pool: self.pool.key(),
            staker: self.staker.key(),
            reward,
            timestamp: current_time,
        });

        Ok(())
    }

    fn pay_out(&self, amount: u64) -> Result<()> {
        let authority = self.pool.authority;
        let pool_id = self.pool.pool_id.to_le_bytes();
        let signer_seeds: &[&[&[u8]]] = &[&[
            POOL_SEED,
            authority.as_ref(),
            pool_id.as_ref(),
            &[self.pool.bump],
        ]];

        match self.pool.reward_source {
            RewardSource::Mint => {
                let mint_ctx = CpiContext::new_with_signer(
                    self.token_program.to_account_info(),
                    MintTo {
                        mint: self.reward_mint.to_account_info(),
                        to: self.user_reward_token_account.to_account_info(),
                        authority: self.pool.to_account_info(),
                    },
                    signer_seeds,
                );
                token::mint_to(mint_ctx, amount)?;

                msg!("Minted {} reward tokens to staker", amount);
            }
            RewardSource::Vault => {
                if self.reward_vault.amount < amount {
                    msg!(
                        "Insufficient reward vault balance: has {}, needs {}",
                        self.reward_vault.amount,
                        amount
                    );
                    log_error!(StakingError::InsufficientRewardTokens, "claim_rewards");
                    return Err(StakingError::InsufficientRewardTokens.into());
                }

                let transfer_ctx = CpiContext::new_with_signer(
                    self.token_program.to_account_info(),
                    Transfer {
                        from: self.reward_vault.to_account_info(),
                        to: self.user_reward_token_account.to_account_info(),
                        authority: self.pool.to_account_info(),
                    },
                    signer_seeds,
                );
                token::transfer(transfer_ctx, amount)?;

                msg!("Transferred {} reward tokens to staker", amount);
            }
        }

        Ok(())
    }
}

/// Rewards a staker could claim at `current_time`.
/// Useful for frontends to display without sending a transaction.
pub fn preview_claim(user_stake: &UserStake, pool: &Pool, current_time: i64) -> Result<u64> {
    user_stake.claimable(pool.reward_rate, current_time)
}

/// Whole days the stake has been open, for display
pub fn staking_days(user_stake: &UserStake, current_time: i64) -> i64 {
    current_time.saturating_sub(user_stake.start_time).max(0) / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PoolConfig;

    const T0: i64 = 1_700_000_000;

    fn initialized_pool(reward_rate: u64) -> Pool {
        let mut pool = Pool::default();
        pool.initialize(
            PoolConfig {
                authority: Pubkey::new_unique(),
                pool_id: 42,
                stake_mint: Pubkey::new_unique(),
                reward_mint: Pubkey::new_unique(),
                stake_vault: Pubkey::new_unique(),
                reward_vault: Pubkey::new_unique(),
                reward_rate,
                reward_source: RewardSource::Mint,
                bump: 255,
            },
            T0,
        )
        .unwrap();
        pool
    }

    /// Initialize(10) -> Stake(50) -> ClaimRewards() in the same second
    #[test]
    fn test_initialize_stake_claim_scenario() {
        let mut pool = initialized_pool(10);
        assert_eq!(pool.total_staked, 0);
        assert_eq!(pool.reward_rate, 10);

        let staker = Pubkey::new_unique();
        let mut user_stake = UserStake::default();
        user_stake
            .deposit(staker, Pubkey::new_unique(), 50, pool.reward_rate, T0, 254)
            .unwrap();
        pool.add_stake(50).unwrap();

        let reward = preview_claim(&user_stake, &pool, T0).unwrap();
        assert_eq!(reward, 0);
        user_stake.record_claim(reward, T0).unwrap();

        assert_eq!(pool.total_staked, 50);
        assert_eq!(user_stake.amount_staked, 50);
        assert!(user_stake.last_claim_time > 0);
        assert_eq!(user_stake.total_claimed, 0);
    }

    #[test]
    fn test_zero_stake_claims_nothing() {
        let pool = initialized_pool(10);
        let mut user_stake = UserStake::default();
        user_stake
            .deposit(Pubkey::new_unique(), Pubkey::new_unique(), 10, 10, T0, 254)
            .unwrap();
        user_stake.withdraw(10, 10, T0).unwrap();

        assert_eq!(preview_claim(&user_stake, &pool, T0 + 3_600).unwrap(), 0);
    }

    #[test]
    fn test_claim_after_elapsed_time() {
        let pool = initialized_pool(10);
        let mut user_stake = UserStake::default();
        user_stake
            .deposit(Pubkey::new_unique(), Pubkey::new_unique(), 50, 10, T0, 254)
            .unwrap();

        let reward = preview_claim(&user_stake, &pool, T0 + 120).unwrap();
        assert_eq!(reward, 50 * 10 * 120);

        user_stake.record_claim(reward, T0 + 120).unwrap();
        let first_claim = user_stake.last_claim_time;

        // The next claim only covers time after the previous one
        let reward = preview_claim(&user_stake, &pool, T0 + 180).unwrap();
        assert_eq!(reward, 50 * 10 * 60);
        user_stake.record_claim(reward, T0 + 180).unwrap();

        assert!(user_stake.last_claim_time > first_claim);
        assert_eq!(user_stake.total_claimed, 50 * 10 * 180);
    }

    #[test]
    fn test_staking_days() {
        let mut user_stake = UserStake::default();
        user_stake.start_time = T0;

        assert_eq!(staking_days(&user_stake, T0), 0);
        assert_eq!(staking_days(&user_stake, T0 + SECONDS_PER_DAY - 1), 0);
        assert_eq!(staking_days(&user_stake, T0 + 3 * SECONDS_PER_DAY), 3);
        assert_eq!(staking_days(&user_stake, T0 - 10), 0);
    }
}
