use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::{
    constants::*,
    error::StakingError,
    events::Unstaked,
    log_error,
    state::{Pool, UserStake},
};

/// Withdraw staked tokens back to the staker
/// Reward accrued so far is settled into the stake record and stays claimable
#[derive(Accounts)]
pub struct Unstake<'info> {
    pub staker: Signer<'info>,

    #[account(
        mut,
        constraint = pool.is_initialized @ StakingError::PoolNotInitialized,
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        mut,
        constraint = user_stake.pool == pool.key() @ StakingError::StakeNotFound,
        constraint = user_stake.staker == staker.key() @ StakingError::Unauthorized,
    )]
    pub user_stake: Account<'info, UserStake>,

    /// Receives the withdrawn tokens
    #[account(
        mut,
        constraint = staker_token_account.mint == pool.stake_mint @ StakingError::InvalidTokenMint,
        constraint = staker_token_account.owner == staker.key() @ StakingError::InvalidTokenAccountOwner,
    )]
    pub staker_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = stake_vault.key() == pool.stake_vault @ StakingError::InvalidTokenAccount,
    )]
    pub stake_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

impl<'info> Unstake<'info> {
    pub fn unstake(&mut self, amount: u64) -> Result<()> {
        let current_time = Clock::get()?.unix_timestamp;

        if amount > self.user_stake.amount_staked {
            msg!(
                "Unstake amount {} exceeds staked balance {}",
                amount,
                self.user_stake.amount_staked
            );
            log_error!(StakingError::InsufficientStake, "unstake");
            return Err(StakingError::InsufficientStake.into());
        }

        let reward_rate = self.pool.reward_rate;
        self.user_stake.withdraw(amount, reward_rate, current_time)?;
        self.pool.remove_stake(amount)?;

        self.transfer_tokens_to_staker(amount)?;

        msg!(
            "UNSTAKE EVENT: staker={}, pool={}, amount={}, remaining={}, pending_rewards={}, total_pool_staked={}",
            self.staker.key(),
            self.pool.key(),
            amount,
            self.user_stake.amount_staked,
            self.user_stake.pending_rewards,
            self.pool.total_staked
        );

        emit!(Unstaked {
            pool: self.pool.key(),
            staker: self.staker.key(),
            amount,
            amount_staked: self.user_stake.amount_staked,
            total_staked: self.pool.total_staked,
            timestamp: current_time,
        });

        Ok(())
    }

    /// Vault tokens are released under the pool PDA's signature
    fn transfer_tokens_to_staker(&self, amount: u64) -> Result<()> {
        let authority = self.pool.authority;
        let pool_id = self.pool.pool_id.to_le_bytes();
        let signer_seeds: &[&[&[u8]]] = &[&[
            POOL_SEED,
            authority.as_ref(),
            pool_id.as_ref(),
            &[self.pool.bump],
        ]];

        let transfer_ctx = CpiContext::new_with_signer(
            self.token_program.to_account_info(),
            Transfer {
                from: self.stake_vault.to_account_info(),
                to: self.staker_token_account.to_account_info(),
                authority: self.pool.to_account_info(),
            },
            signer_seeds,
        );

        token::transfer(transfer_ctx, amount)?;

        msg!("Returned {} tokens from stake vault", amount);

        Ok(())
    }
}
