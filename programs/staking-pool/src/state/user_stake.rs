use anchor_lang::prelude::*;

use crate::{constants::is_valid_amount, error::StakingError};

/// Individual stake record - one per staker per pool
#[account]
#[derive(InitSpace, Default)]
pub struct UserStake {
    /// The staker who owns this record
    pub staker: Pubkey,

    /// Which pool this stake belongs to
    pub pool: Pubkey,

    /// Tokens currently staked
    pub amount_staked: u64,

    /// Reward settled from earlier accrual windows but not yet paid out
    pub pending_rewards: u64,

    /// When the staker first staked
    pub start_time: i64,

    /// Start of the accrual window that has not been settled yet
    pub last_accrual_time: i64,

    /// Zero until the first successful claim
    pub last_claim_time: i64,

    /// Lifetime rewards paid out
    pub total_claimed: u64,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

/// Reward for `amount_staked` tokens at `reward_rate` over `elapsed` seconds.
/// Integer math only; a negative window means the clock went backwards.
pub fn calculate_reward(amount_staked: u64, reward_rate: u64, elapsed: i64) -> Result<u64> {
    require!(elapsed >= 0, StakingError::InvalidTimestamp);

    let reward = (amount_staked as u128)
        .checked_mul(reward_rate as u128)
        .and_then(|x| x.checked_mul(elapsed as u128))
        .ok_or(StakingError::RewardCalculationOverflow)?;

    u64::try_from(reward).map_err(|_| error!(StakingError::RewardCalculationOverflow))
}

impl UserStake {
    /// A freshly allocated record has never been assigned a staker
    pub fn is_new(&self) -> bool {
        self.staker == Pubkey::default()
    }

    /// Reward accrued in the open window, not counting `pending_rewards`
    pub fn accrued_since_last(&self, reward_rate: u64, now: i64) -> Result<u64> {
        let elapsed = now
            .checked_sub(self.last_accrual_time)
            .ok_or(StakingError::InvalidTimestamp)?;
        calculate_reward(self.amount_staked, reward_rate, elapsed)
    }

    /// Everything the staker could claim at `now`
    pub fn claimable(&self, reward_rate: u64, now: i64) -> Result<u64> {
        let accrued = self.accrued_since_last(reward_rate, now)?;
        self.pending_rewards
            .checked_add(accrued)
            .ok_or(StakingError::RewardCalculationOverflow.into())
    }

    /// Close the open window into `pending_rewards` and start a new one at `now`.
    /// Must run before `amount_staked` changes so past time is priced at the old balance.
    pub fn settle(&mut self, reward_rate: u64, now: i64) -> Result<u64> {
        self.pending_rewards = self.claimable(reward_rate, now)?;
        self.last_accrual_time = now;
        Ok(self.pending_rewards)
    }

    /// Add `amount` to the stake, opening the record on first use
    pub fn deposit(
        &mut self,
        staker: Pubkey,
        pool: Pubkey,
        amount: u64,
        reward_rate: u64,
        now: i64,
        bump: u8,
    ) -> Result<()> {
        require!(is_valid_amount(amount), StakingError::InvalidAmount);

        // Overflow is caught before the record is touched
        let current = if self.is_new() { 0 } else { self.amount_staked };
        let new_amount = current
            .checked_add(amount)
            .ok_or(StakingError::MathOverflow)?;

        if self.is_new() {
            self.staker = staker;
            self.pool = pool;
            self.amount_staked = 0;
            self.pending_rewards = 0;
            self.start_time = now;
            self.last_accrual_time = now;
            self.last_claim_time = 0;
            self.total_claimed = 0;
            self.bump = bump;
        } else {
            self.settle(reward_rate, now)?;
        }

        self.amount_staked = new_amount;

        Ok(())
    }

    /// Remove `amount` from the stake. Accrued reward stays claimable.
    pub fn withdraw(&mut self, amount: u64, reward_rate: u64, now: i64) -> Result<()> {
        require!(is_valid_amount(amount), StakingError::InvalidAmount);
        require!(amount <= self.amount_staked, StakingError::InsufficientStake);

        self.settle(reward_rate, now)?;
        self.amount_staked -= amount;

        Ok(())
    }

    /// Book a successful payout of `reward` at `now`.
    /// Call only once the payout itself has gone through.
    pub fn record_claim(&mut self, reward: u64, now: i64) -> Result<()> {
        require!(
            now >= self.last_claim_time && now >= self.last_accrual_time,
            StakingError::InvalidTimestamp
        );

        self.total_claimed = self
            .total_claimed
            .checked_add(reward)
            .ok_or(StakingError::MathOverflow)?;
        self.pending_rewards = 0;
        self.last_accrual_time = now;
        self.last_claim_time = now;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;

    const T0: i64 = 1_700_000_000;

    fn opened(amount: u64) -> UserStake {
        let mut stake = UserStake::default();
        stake
            .deposit(Pubkey::new_unique(), Pubkey::new_unique(), amount, 10, T0, 255)
            .unwrap();
        stake
    }

    #[test]
    fn test_calculate_reward() {
        assert_eq!(calculate_reward(50, 10, 0).unwrap(), 0);
        assert_eq!(calculate_reward(0, 10, 3_600).unwrap(), 0);
        assert_eq!(calculate_reward(50, 0, 3_600).unwrap(), 0);
        assert_eq!(calculate_reward(50, 10, 3).unwrap(), 1_500);
        assert!(calculate_reward(50, 10, -1).is_err());
        assert_eq!(
            calculate_reward(u64::MAX, 2, 1).unwrap_err(),
            Error::from(StakingError::RewardCalculationOverflow)
        );
    }

    #[test]
    fn test_first_deposit_opens_record() {
        let staker = Pubkey::new_unique();
        let pool = Pubkey::new_unique();
        let mut stake = UserStake::default();
        assert!(stake.is_new());

        stake.deposit(staker, pool, 50, 10, T0, 253).unwrap();

        assert!(!stake.is_new());
        assert_eq!(stake.staker, staker);
        assert_eq!(stake.pool, pool);
        assert_eq!(stake.amount_staked, 50);
        assert_eq!(stake.start_time, T0);
        assert_eq!(stake.last_accrual_time, T0);
        assert_eq!(stake.last_claim_time, 0);
        assert_eq!(stake.bump, 253);
    }

    #[test]
    fn test_zero_deposit_rejected() {
        let mut stake = UserStake::default();
        let err = stake
            .deposit(Pubkey::new_unique(), Pubkey::new_unique(), 0, 10, T0, 255)
            .unwrap_err();
        assert_eq!(err, Error::from(StakingError::InvalidAmount));
        assert!(stake.is_new());
    }

    #[test]
    fn test_sequential_deposits_accumulate_and_settle() {
        let mut stake = opened(30);
        let staker = stake.staker;

        // 100s at 30 tokens, rate 10 -> 30_000 settled before the balance grows
        stake
            .deposit(staker, stake.pool, 20, 10, T0 + 100, 0)
            .unwrap();

        assert_eq!(stake.amount_staked, 50);
        assert_eq!(stake.pending_rewards, 30_000);
        assert_eq!(stake.last_accrual_time, T0 + 100);
        // Re-deposit keeps the original identity and start time
        assert_eq!(stake.staker, staker);
        assert_eq!(stake.start_time, T0);
        assert_eq!(stake.bump, 255);

        // Next 10s priced at 50 tokens
        assert_eq!(stake.claimable(10, T0 + 110).unwrap(), 30_000 + 5_000);
    }

    #[test]
    fn test_overflowing_deposit_leaves_record_untouched() {
        let mut stake = UserStake::default();
        let staker = Pubkey::new_unique();
        let pool = Pubkey::new_unique();
        stake.deposit(staker, pool, u64::MAX - 5, 0, 100, 255).unwrap();

        let err = stake.deposit(staker, pool, 10, 0, 200, 255).unwrap_err();

        assert_eq!(err, Error::from(StakingError::MathOverflow));
        assert_eq!(stake.amount_staked, u64::MAX - 5);
        assert_eq!(stake.pending_rewards, 0);
        assert_eq!(stake.last_accrual_time, 100);
    }

    #[test]
    fn test_same_second_claims_keep_last_claim_time() {
        let mut stake = opened(50);
        stake.record_claim(0, T0 + 10).unwrap();
        stake.record_claim(0, T0 + 10).unwrap();
        assert_eq!(stake.last_claim_time, T0 + 10);
    }

    #[test]
    fn test_claimable_rejects_backwards_clock() {
        let stake = opened(50);
        assert_eq!(
            stake.claimable(10, T0 - 1).unwrap_err(),
            Error::from(StakingError::InvalidTimestamp)
        );
    }

    #[test]
    fn test_record_claim_resets_window() {
        let mut stake = opened(50);
        let reward = stake.claimable(10, T0 + 60).unwrap();
        assert_eq!(reward, 30_000);

        stake.record_claim(reward, T0 + 60).unwrap();

        assert_eq!(stake.pending_rewards, 0);
        assert_eq!(stake.last_accrual_time, T0 + 60);
        assert_eq!(stake.last_claim_time, T0 + 60);
        assert_eq!(stake.total_claimed, 30_000);
        assert_eq!(stake.claimable(10, T0 + 60).unwrap(), 0);
    }

    #[test]
    fn test_last_claim_time_is_monotonic() {
        let mut stake = opened(50);
        stake.record_claim(0, T0 + 10).unwrap();
        let before = stake.last_claim_time;

        stake.record_claim(0, T0 + 20).unwrap();
        assert!(stake.last_claim_time > before);

        assert!(stake.record_claim(0, T0 + 5).is_err());
        assert_eq!(stake.last_claim_time, T0 + 20);
    }

    #[test]
    fn test_withdraw_keeps_accrued_reward() {
        let mut stake = opened(50);

        stake.withdraw(20, 10, T0 + 10).unwrap();

        assert_eq!(stake.amount_staked, 30);
        assert_eq!(stake.pending_rewards, 5_000);
        assert_eq!(stake.claimable(10, T0 + 20).unwrap(), 5_000 + 3_000);
    }

    #[test]
    fn test_withdraw_validation() {
        let mut stake = opened(50);

        assert_eq!(
            stake.withdraw(0, 10, T0).unwrap_err(),
            Error::from(StakingError::InvalidAmount)
        );
        assert_eq!(
            stake.withdraw(51, 10, T0).unwrap_err(),
            Error::from(StakingError::InsufficientStake)
        );
        assert_eq!(stake.amount_staked, 50);
        assert_eq!(stake.pending_rewards, 0);

        stake.withdraw(50, 10, T0).unwrap();
        assert_eq!(stake.amount_staked, 0);
        assert!(!stake.is_new());
    }
}
