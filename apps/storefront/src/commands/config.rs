//! # Configuration Commands
//!
//! Shows the effective settings after files and environment overrides.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::state::ConfigState;
use drivehub_client::{ClientConfig, PaymentMode};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDto {
    pub store_name: String,
    pub currency_code: String,
    pub currency_symbol: String,
    pub currency_decimals: u8,
    pub api_base_url: String,
    pub request_timeout_secs: Option<u64>,
    pub payment_mode: PaymentMode,
    pub database_path: String,
    pub session_path: Option<String>,
}

pub fn show_config(
    config: &ConfigState,
    client: &ClientConfig,
    database_path: &Path,
    session_path: Option<&Path>,
) -> ConfigDto {
    debug!("show_config command");

    ConfigDto {
        store_name: config.store_name.clone(),
        currency_code: config.currency_code.clone(),
        currency_symbol: config.currency_symbol.clone(),
        currency_decimals: config.currency_decimals,
        api_base_url: client.api.base_url.clone(),
        request_timeout_secs: client.api.request_timeout_secs,
        payment_mode: client.payment_mode(),
        database_path: database_path.display().to_string(),
        session_path: session_path.map(|p| p.display().to_string()),
    }
}
