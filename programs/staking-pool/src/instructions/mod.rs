pub mod adjust_reward_rate;
pub mod claim_rewards;
pub mod initialize;
pub mod stake;
pub mod unstake;

pub use adjust_reward_rate::*;
pub use claim_rewards::*;
pub use initialize::*;
pub use stake::*;
pub use unstake::*;
