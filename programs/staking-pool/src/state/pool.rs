use anchor_lang::prelude::*;

use crate::{constants::is_valid_reward_rate, error::StakingError};

/// Where claimed rewards come from. Chosen once per deployment.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub enum RewardSource {
    /// The pool PDA is the reward mint's authority and mints every payout
    #[default]
    Mint,
    /// Payouts are transferred out of the pool's pre-funded reward vault
    Vault,
}

/// The staking pool: aggregate stake and reward rate for one deployment
#[account]
#[derive(InitSpace, Default)]
pub struct Pool {
    /// Who initialized the pool; the only signer allowed to change its rate
    pub authority: Pubkey,

    /// Caller-chosen identifier, part of the pool PDA seeds
    pub pool_id: u64,

    /// The token users stake
    pub stake_mint: Pubkey,

    /// The token paid out as rewards (may equal stake_mint)
    pub reward_mint: Pubkey,

    /// Token account custodying all staked tokens
    pub stake_vault: Pubkey,

    /// Token account funding payouts when `reward_source` is `Vault`
    pub reward_vault: Pubkey,

    /// Reward units accrued per staked unit per second
    pub reward_rate: u64,

    /// Sum of `amount_staked` across every UserStake of this pool
    pub total_staked: u64,

    pub reward_source: RewardSource,

    pub created_at: i64,

    pub is_initialized: bool,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

/// Everything `Pool::initialize` records about a fresh pool
pub struct PoolConfig {
    pub authority: Pubkey,
    pub pool_id: u64,
    pub stake_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub stake_vault: Pubkey,
    pub reward_vault: Pubkey,
    pub reward_rate: u64,
    pub reward_source: RewardSource,
    pub bump: u8,
}

impl Pool {
    /// True until `initialize` has populated the record
    pub fn is_vacant(&self) -> bool {
        !self.is_initialized
    }

    /// Populate an uninitialized pool record. Re-initialization is rejected
    /// and leaves the existing record untouched.
    pub fn initialize(&mut self, config: PoolConfig, now: i64) -> Result<()> {
        require!(!self.is_initialized, StakingError::AlreadyInitialized);
        require!(
            is_valid_reward_rate(config.reward_rate),
            StakingError::InvalidParameter
        );

        self.authority = config.authority;
        self.pool_id = config.pool_id;
        self.stake_mint = config.stake_mint;
        self.reward_mint = config.reward_mint;
        self.stake_vault = config.stake_vault;
        self.reward_vault = config.reward_vault;
        self.reward_rate = config.reward_rate;
        self.reward_source = config.reward_source;
        self.total_staked = 0;
        self.created_at = now;
        self.is_initialized = true;
        self.bump = config.bump;

        Ok(())
    }

    pub fn add_stake(&mut self, amount: u64) -> Result<()> {
        self.total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(StakingError::MathOverflow)?;
        Ok(())
    }

    pub fn remove_stake(&mut self, amount: u64) -> Result<()> {
        self.total_staked = self
            .total_staked
            .checked_sub(amount)
            .ok_or(StakingError::MathOverflow)?;
        Ok(())
    }

    pub fn set_reward_rate(&mut self, new_rate: u64) -> Result<()> {
        require!(is_valid_reward_rate(new_rate), StakingError::InvalidParameter);
        self.reward_rate = new_rate;
        Ok(())
    }
}
