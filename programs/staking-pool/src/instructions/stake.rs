use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::{
    constants::*,
    error::StakingError,
    events::Staked,
    log_error,
    state::{Pool, UserStake},
};

/// Stake tokens into a pool
/// Creates the staker's record on first use and moves tokens into the stake vault
#[derive(Accounts)]
pub struct Stake<'info> {
    /// Signs the token transfer and pays for the stake record
    #[account(mut)]
    pub staker: Signer<'info>,

    #[account(
        mut,
        constraint = pool.is_initialized @ StakingError::PoolNotInitialized,
    )]
    pub pool: Account<'info, Pool>,

    /// PDA: ["stake", pool.key(), staker.key()]
    #[account(
        init_if_needed,
        payer = staker,
        space = DISCRIMINATOR_SIZE + UserStake::INIT_SPACE,
        seeds = [STAKE_SEED, pool.key().as_ref(), staker.key().as_ref()],
        bump
    )]
    pub user_stake: Account<'info, UserStake>,

    /// Source of the staked tokens
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

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

impl<'info> Stake<'info> {
    /// Execute the staking operation. Any failure aborts the whole
    /// transaction, so the transfer and both record updates land together.
    pub fn stake(&mut self, amount: u64, bumps: &StakeBumps) -> Result<()> {
        let current_time = Clock::get()?.unix_timestamp;

        if !is_valid_amount(amount) {
            log_error!(StakingError::InvalidAmount, "stake");
            return Err(StakingError::InvalidAmount.into());
        }

        // An insufficient balance fails inside the token program
        self.transfer_tokens_to_vault(amount)?;

        let first_stake = self.user_stake.is_new();
        self.user_stake.deposit(
            self.staker.key(),
            self.pool.key(),
            amount,
            self.pool.reward_rate,
            current_time,
            bumps.user_stake,
        )?;
        if first_stake {
            msg!("User stake opened at {}", current_time);
        }

        self.pool.add_stake(amount)?;

        msg!(
            "STAKE EVENT: staker={}, pool={}, amount={}, amount_staked={}, total_pool_staked={}",
            self.staker.key(),
            self.pool.key(),
            amount,
            self.user_stake.amount_staked,
            self.pool.total_staked
        );

        emit!(Staked {
            pool: self.pool.key(),
            staker: self.staker.key(),
            amount,
            amount_staked: self.user_stake.amount_staked,
            total_staked: self.pool.total_staked,
            timestamp: current_time,
        });

        Ok(())
    }

    fn transfer_tokens_to_vault(&self, amount: u64) -> Result<()> {
        let transfer_ctx = CpiContext::new(
            self.token_program.to_account_info(),
            Transfer {
                from: self.staker_token_account.to_account_info(),
                to: self.stake_vault.to_account_info(),
                authority: self.staker.to_account_info(),
            },
        );

        token::transfer(transfer_ctx, amount)?;

        msg!("Transferred {} tokens to stake vault", amount);

        Ok(())
    }
}
