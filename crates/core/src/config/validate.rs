use std::ops::RangeInclusive;

use super::{types::Config, ConfigError, SmoothingKind};

/// Allowed search results per keyword.
pub const PAGE_SIZE_RANGE: RangeInclusive<u32> = 10..=15;

/// Validate configuration.
///
/// A missing API key is reported here so the service never starts without
/// the credential.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(invalid("server.port cannot be 0"));
    }

    let youtube = &config.youtube;
    if youtube.api_key.trim().is_empty() {
        return Err(invalid(
            "youtube.api_key is required (or set YOUTUBE_API_KEY)",
        ));
    }
    if youtube.timeout_secs == 0 {
        return Err(invalid("youtube.timeout_secs must be greater than 0"));
    }
    if !PAGE_SIZE_RANGE.contains(&youtube.page_size) {
        return Err(ConfigError::ValidationError(format!(
            "youtube.page_size must be between {} and {}",
            PAGE_SIZE_RANGE.start(),
            PAGE_SIZE_RANGE.end()
        )));
    }

    if config.hunt.lookback_days == 0 {
        return Err(invalid("hunt.lookback_days must be greater than 0"));
    }

    let constant = config.scoring.smoothing_constant;
    if !constant.is_finite() || constant < 0.0 {
        return Err(invalid(
            "scoring.smoothing_constant must be a finite, non-negative number",
        ));
    }
    if config.scoring.policy == SmoothingKind::Smoothed && constant == 0.0 {
        return Err(invalid(
            "scoring.smoothing_constant must be positive with the smoothed policy (use policy = \"floored\" for no smoothing)",
        ));
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
