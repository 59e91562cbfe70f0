//! Account configuration loading and validation commands.
//!
//! Account documents are TOML on disk for operator workflows; the request
//! path receives the same shape as JSON from account storage.

use std::fs;
use std::path::PathBuf;

use privacy_gate_common::account::AccountPrivacyConfig;
use validator::Validate;

use crate::error::CliError;

/// Load an account privacy document from a TOML file and validate it.
pub(crate) fn load_account_config(
    file: &PathBuf,
    verbose: bool,
) -> Result<AccountPrivacyConfig, CliError> {
    let content = fs::read_to_string(file)?;

    if verbose {
        println!("Loading account config from: {}", file.display());
    }

    let config: AccountPrivacyConfig = toml::from_str(&content)?;

    config
        .validate()
        .map_err(|e| CliError::Config(format!("account config validation failed: {e}")))?;

    Ok(config)
}

/// Validate an account configuration file and report what it enables.
pub fn validate(file: PathBuf, verbose: bool) -> Result<(), CliError> {
    let config = load_account_config(&file, verbose)?;

    println!("Account config is valid");
    println!("  File: {}", file.display());

    let enabled: Vec<String> = config
        .enabled_qualifiers()
        .map(|qualifier| qualifier.to_string())
        .collect();
    if enabled.is_empty() {
        println!("  Enabled privacy modules: none");
    } else {
        println!("  Enabled privacy modules: {}", enabled.join(", "));
    }
    if config.us_nat.enabled && !config.us_nat.skip_section_ids.is_empty() {
        println!(
            "  us_nat skip sections: {:?}",
            config.us_nat.skip_section_ids
        );
    }

    Ok(())
}
