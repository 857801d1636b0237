use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    constants::*,
    error::StakingError,
    events::PoolInitialized,
    log_error,
    state::{Pool, PoolConfig, RewardSource},
};

/// Create a staking pool and its token vaults
#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct Initialize<'info> {
    /// Pays for the accounts and becomes the pool authority
    #[account(mut)]
    pub authority: Signer<'info>,

    /// PDA: ["pool", authority.key(), pool_id]
    /// Allocated on demand so a repeat call fails with AlreadyInitialized.
    /// Declared before the vaults so this check runs ahead of their mint checks.
    #[account(
        init_if_needed,
        payer = authority,
        space = DISCRIMINATOR_SIZE + Pool::INIT_SPACE,
        seeds = [POOL_SEED, authority.key().as_ref(), pool_id.to_le_bytes().as_ref()],
        bump,
        constraint = pool.is_vacant() @ StakingError::AlreadyInitialized,
    )]
    pub pool: Account<'info, Pool>,

    pub stake_mint: Account<'info, Mint>,

    pub reward_mint: Account<'info, Mint>,

    /// PDA: ["stake_vault", pool.key()], owned by the pool
    #[account(
        init_if_needed,
        payer = authority,
        seeds = [STAKE_VAULT_SEED, pool.key().as_ref()],
        bump,
        token::mint = stake_mint,
        token::authority = pool,
    )]
    pub stake_vault: Account<'info, TokenAccount>,

    /// PDA: ["reward_vault", pool.key()], owned by the pool
    /// Only funded and drawn from when rewards come from a treasury
    #[account(
        init_if_needed,
        payer = authority,
        seeds = [REWARD_VAULT_SEED, pool.key().as_ref()],
        bump,
        token::mint = reward_mint,
        token::authority = pool,
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

impl<'info> Initialize<'info> {
    pub fn initialize(
        &mut self,
        pool_id: u64,
        reward_rate: u64,
        reward_source: RewardSource,
        bumps: &InitializeBumps,
    ) -> Result<()> {
        let current_time = Clock::get()?.unix_timestamp;

        self.validate_parameters(reward_rate, reward_source)?;

        let config = PoolConfig {
            authority: self.authority.key(),
            pool_id,
            stake_mint: self.stake_mint.key(),
            reward_mint: self.reward_mint.key(),
            stake_vault: self.stake_vault.key(),
            reward_vault: self.reward_vault.key(),
            reward_rate,
            reward_source,
            bump: bumps.pool,
        };
        self.pool.initialize(config, current_time)?;

        msg!(
            "Staking pool initialized: ID={}, Authority={}, StakeMint={}, RewardMint={}",
            pool_id,
            self.pool.authority,
            self.pool.stake_mint,
            self.pool.reward_mint
        );
        msg!(
            "Pool parameters: RewardRate={}, RewardSource={:?}",
            self.pool.reward_rate,
            self.pool.reward_source
        );

        emit!(PoolInitialized {
            pool: self.pool.key(),
            authority: self.pool.authority,
            pool_id,
            reward_rate,
            reward_source,
            timestamp: current_time,
        });

        Ok(())
    }

    fn validate_parameters(&self, reward_rate: u64, reward_source: RewardSource) -> Result<()> {
        if !self.pool.is_vacant() {
            log_error!(StakingError::AlreadyInitialized, "initialize");
            return Err(StakingError::AlreadyInitialized.into());
        }

        if !is_valid_reward_rate(reward_rate) {
            msg!(
                "Invalid reward rate: {}. Must not exceed {}",
                reward_rate,
                MAX_REWARD_RATE
            );
            return Err(StakingError::InvalidParameter.into());
        }

        // Minted payouts are signed by the pool PDA
        if reward_source == RewardSource::Mint
            && self.reward_mint.mint_authority != COption::Some(self.pool.key())
        {
            log_error!(StakingError::InvalidMintAuthority, "initialize");
            return Err(StakingError::InvalidMintAuthority.into());
        }

        if self.stake_mint.key() == self.reward_mint.key() {
            msg!("Single-token staking pool detected (stake and reward tokens are the same)");
        }

        Ok(())
    }
}

/// Parse a reward rate typed by a user, e.g. from a CLI flag or form field.
/// Negative, non-numeric and out-of-range input is rejected before any
/// transaction is built.
pub fn parse_reward_rate(input: &str) -> Result<u64> {
    let rate = input
        .trim()
        .parse::<u64>()
        .map_err(|_| error!(StakingError::InvalidParameter))?;

    require!(is_valid_reward_rate(rate), StakingError::InvalidParameter);

    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;

    #[test]
    fn test_parse_reward_rate() {
        assert_eq!(parse_reward_rate("10").unwrap(), 10);
        assert_eq!(parse_reward_rate(" 0 ").unwrap(), 0);
        assert_eq!(
            parse_reward_rate(&MAX_REWARD_RATE.to_string()).unwrap(),
            MAX_REWARD_RATE
        );
    }

    #[test]
    fn test_parse_reward_rate_rejects_bad_input() {
        let invalid = Error::from(StakingError::InvalidParameter);

        assert_eq!(parse_reward_rate("-5").unwrap_err(), invalid);
        assert_eq!(parse_reward_rate("ten").unwrap_err(), invalid);
        assert_eq!(parse_reward_rate("").unwrap_err(), invalid);
        assert_eq!(parse_reward_rate("1.5").unwrap_err(), invalid);
        assert_eq!(
            parse_reward_rate(&(MAX_REWARD_RATE + 1).to_string()).unwrap_err(),
            invalid
        );
    }
}
