//! # Configuration State
//!
//! Display settings for the storefront.
//!
//! `DRIVEHUB_*` environment variables win over the defaults below. Backend and payment settings live in `drivehub_client::ClientConfig`.

use serde::{Deserialize, Serialize};

use drivehub_core::Money;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Shown in the CLI banner and receipts
    pub store_name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            store_name: "DriveHub".to_string(),
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
        }
    }
}

impl ConfigState {
    /// Defaults overlaid with `DRIVEHUB_STORE_NAME`, `DRIVEHUB_CURRENCY_CODE`,
    /// `DRIVEHUB_CURRENCY_SYMBOL` and `DRIVEHUB_CURRENCY_DECIMALS` (0-2).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ConfigState::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ConfigState::default();
        ConfigState {
            store_name: lookup("DRIVEHUB_STORE_NAME").unwrap_or(defaults.store_name),
            currency_code: lookup("DRIVEHUB_CURRENCY_CODE").unwrap_or(defaults.currency_code),
            currency_symbol: lookup("DRIVEHUB_CURRENCY_SYMBOL")
                .unwrap_or(defaults.currency_symbol),
            currency_decimals: lookup("DRIVEHUB_CURRENCY_DECIMALS")
                .and_then(|d| d.parse::<u8>().ok())
                .map_or(defaults.currency_decimals, |d| d.min(2)),
        }
    }

    /// Renders an amount held in cents with the configured symbol.
    ///
    /// With fewer than two decimals the amount is rounded half away from
    /// zero, so `currency_decimals = 0` shows 4550 cents as `$46`.
    ///
    /// ```rust
    /// use drivehub_storefront::state::ConfigState;
    ///
    /// assert_eq!(ConfigState::default().format_currency(15000), "$150.00");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let decimals = u32::from(self.currency_decimals.min(2));
        let step = 10_i64.pow(2 - decimals);
        let units = (cents.abs() + step / 2) / step;
        let sign = if cents < 0 && units > 0 { "-" } else { "" };

        let amount = match decimals {
            0 => units.to_string(),
            d => {
                let scale = 10_i64.pow(d);
                format!("{}.{:0width$}", units / scale, units % scale, width = d as usize)
            }
        };
        format!("{sign}{}{amount}", self.currency_symbol)
    }

    pub fn format_money(&self, amount: Money) -> String {
        self.format_currency(amount.cents())
    }
}
