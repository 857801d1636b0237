use anchor_lang::prelude::*;

/// Custom error types for the staking pool
/// Each variant carries the message surfaced to clients
#[error_code]
pub enum StakingError {
    // Pool Management Errors
    #[msg("Staking pool is already initialized")]
    AlreadyInitialized,

    #[msg("Staking pool has not been initialized")]
    PoolNotInitialized,

    #[msg("Only the pool authority can perform this action")]
    UnauthorizedPoolAuthority,

    #[msg("Invalid parameter provided")]
    InvalidParameter,

    #[msg("Pool must be the mint authority of the reward mint")]
    InvalidMintAuthority,

    // Staking Errors
    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    #[msg("Amount exceeds the staked balance")]
    InsufficientStake,

    // Claim Errors
    #[msg("Stake does not belong to the caller")]
    Unauthorized,

    #[msg("No stake found for this pool")]
    StakeNotFound,

    #[msg("Insufficient reward tokens in vault")]
    InsufficientRewardTokens,

    #[msg("Reward calculation overflow")]
    RewardCalculationOverflow,

    // Time and Math Errors
    #[msg("Invalid timestamp provided")]
    InvalidTimestamp,

    #[msg("Mathematical overflow in calculations")]
    MathOverflow,

    // Token and Account Errors
    #[msg("Invalid token mint provided")]
    InvalidTokenMint,

    #[msg("Invalid token account provided")]
    InvalidTokenAccount,

    #[msg("Token account is not owned by the expected authority")]
    InvalidTokenAccountOwner,
}

impl StakingError {
    /// Get error code as u32 for logging
    pub fn error_code(&self) -> u32 {
        match self {
            // Pool errors: 1000-1099
            StakingError::AlreadyInitialized => 1001,
            StakingError::PoolNotInitialized => 1002,
            StakingError::UnauthorizedPoolAuthority => 1003,
            StakingError::InvalidParameter => 1004,
            StakingError::InvalidMintAuthority => 1005,

            // Staking errors: 1100-1199
            StakingError::InvalidAmount => 1101,
            StakingError::InsufficientStake => 1102,

            // Reward errors: 1300-1399
            StakingError::Unauthorized => 1301,
            StakingError::StakeNotFound => 1302,
            StakingError::InsufficientRewardTokens => 1303,
            StakingError::RewardCalculationOverflow => 1304,

            // Math errors: 1400-1499
            StakingError::InvalidTimestamp => 1401,
            StakingError::MathOverflow => 1402,

            // Token errors: 1500-1599
            StakingError::InvalidTokenMint => 1501,
            StakingError::InvalidTokenAccount => 1502,
            StakingError::InvalidTokenAccountOwner => 1503,
        }
    }

    /// Get human-readable error category
    pub fn category(&self) -> &'static str {
        match self.error_code() {
            1000..=1099 => "Pool Management",
            1100..=1199 => "Staking Operations",
            1300..=1399 => "Reward Operations",
            1400..=1499 => "Mathematical Operations",
            1500..=1599 => "Token Operations",
            _ => "Unknown",
        }
    }
}

/// Log an error with its code and category before it is returned
#[macro_export]
macro_rules! log_error {
    ($error:expr, $context:expr) => {
        msg!(
            "Error {}: {} in context: {}",
            $error.error_code(),
            $error.category(),
            $context
        );
    };
}
