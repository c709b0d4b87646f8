//! Configuration validation.
//!
//! Collects every problem before failing so a misconfigured deployment
//! reports them all at once.

use beacon_common::ConfigError;

use crate::BeaconConfig;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &BeaconConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_base_url(&mut errors, &config.api_base);
    validate_app_id(&mut errors, &config.app_id);

    if config.poll_interval.is_zero() {
        errors.push("poll_interval must be greater than zero".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_base_url(errors: &mut Vec<String>, api_base: &str) {
    if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
        errors.push(format!(
            "api_base must start with http:// or https://, got '{api_base}'"
        ));
    }
}

/// Discord application ids are numeric snowflakes.
fn validate_app_id(errors: &mut Vec<String>, app_id: &str) {
    if app_id.is_empty() || !app_id.chars().all(|c| c.is_ascii_digit()) {
        errors.push(format!("app_id must be numeric, got '{app_id}'"));
    }
}
