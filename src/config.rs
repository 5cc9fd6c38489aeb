use std::collections::HashMap;
use thiserror::Error;

/// Commitment deadline: blocks after activation to purchase the target.
pub const DEFAULT_COMMIT_GRACE_BLOCKS: u64 = 86_400;
/// Yield-release and cabin-withdrawal deadline in blocks.
pub const DEFAULT_RELEASE_GRACE_BLOCKS: u64 = 201_600;

/// Per-chain engine parameters. Defaults are the live chain constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub commit_grace_blocks: u64,
    pub release_grace_blocks: u64,
    pub cabin_withdraw_grace_blocks: u64,
    /// Seconds per block; only used to project block counts onto wall-clock time.
    pub expected_block_time_secs: u64,
    /// A deadline closer than this is a Warning.
    pub warning_window_secs: u64,
    pub token_decimals: u8,
    pub display_precision: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            commit_grace_blocks: DEFAULT_COMMIT_GRACE_BLOCKS,
            release_grace_blocks: DEFAULT_RELEASE_GRACE_BLOCKS,
            cabin_withdraw_grace_blocks: DEFAULT_RELEASE_GRACE_BLOCKS,
            expected_block_time_secs: 6,
            warning_window_secs: 86_400,
            token_decimals: 18,
            display_precision: 2,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = EngineConfig::default();

        let commit_grace_blocks = parse_u64(
            &env_map,
            "DPO_COMMIT_GRACE_BLOCKS",
            defaults.commit_grace_blocks,
        )?;
        let release_grace_blocks = parse_u64(
            &env_map,
            "DPO_RELEASE_GRACE_BLOCKS",
            defaults.release_grace_blocks,
        )?;
        let cabin_withdraw_grace_blocks = parse_u64(
            &env_map,
            "DPO_CABIN_WITHDRAW_GRACE_BLOCKS",
            defaults.cabin_withdraw_grace_blocks,
        )?;

        let expected_block_time_secs = parse_u64(
            &env_map,
            "DPO_EXPECTED_BLOCK_TIME_SECS",
            defaults.expected_block_time_secs,
        )?;
        if expected_block_time_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "DPO_EXPECTED_BLOCK_TIME_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let warning_window_secs = parse_u64(
            &env_map,
            "DPO_WARNING_WINDOW_SECS",
            defaults.warning_window_secs,
        )?;

        let token_decimals = env_map
            .get("DPO_TOKEN_DECIMALS")
            .map(|s| s.as_str())
            .unwrap_or("18")
            .parse::<u8>()
            .ok()
            .filter(|d| *d <= 38)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "DPO_TOKEN_DECIMALS".to_string(),
                    "must be an integer between 0 and 38".to_string(),
                )
            })?;

        let display_precision = env_map
            .get("DPO_DISPLAY_PRECISION")
            .map(|s| s.as_str())
            .unwrap_or("2")
            .parse::<u8>()
            .ok()
            .filter(|p| *p <= 18)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "DPO_DISPLAY_PRECISION".to_string(),
                    "must be an integer between 0 and 18".to_string(),
                )
            })?;

        Ok(EngineConfig {
            commit_grace_blocks,
            release_grace_blocks,
            cabin_withdraw_grace_blocks,
            expected_block_time_secs,
            warning_window_secs,
            token_decimals,
            display_precision,
        })
    }
}

fn parse_u64(
    env_map: &HashMap<String, String>,
    key: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    match env_map.get(key) {
        Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), "must be a valid u64".to_string())
        }),
        None => Ok(default),
    }
}
