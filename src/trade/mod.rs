//! Trade form stub.
//!
//! Collects an amount and a currency and, on buy or sell, reports the intent.
//! Nothing is sent anywhere and nothing is executed; the amount is kept as
//! typed, without range or sign checks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Requested side of the trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    /// Buy the selected currency.
    Buy,
    /// Sell the selected currency.
    Sell,
}

impl TradeAction {
    /// Lowercase name, as used in log lines and `data-action` attributes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Currencies offered by the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Bitcoin, selected by default.
    #[default]
    Btc,
    /// Ethereum.
    Eth,
    /// Tether.
    Usdt,
}

impl Currency {
    /// All currencies, in the order the form lists them.
    pub const ALL: [Self; 3] = [Self::Btc, Self::Eth, Self::Usdt];

    /// Ticker symbol.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Btc => "BTC",
            Self::Eth => "ETH",
            Self::Usdt => "USDT",
        }
    }

    /// Option label shown in the currency select.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Btc => "Bitcoin (BTC)",
            Self::Eth => "Ethereum (ETH)",
            Self::Usdt => "Tether (USDT)",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a currency code is not one of the offered three.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported currency: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.code() == s)
            .ok_or_else(|| UnknownCurrency(s.to_string()))
    }
}

/// A requested buy or sell. Never executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeIntent {
    /// Buy or sell.
    pub action: TradeAction,
    /// Amount exactly as entered.
    pub amount: String,
    /// Currency selected when the action was invoked.
    pub currency: Currency,
}

impl TradeIntent {
    /// Console line, e.g. `buy 2.5 ETH`.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        format!("{} {} {}", self.action, self.amount, self.currency)
    }

    /// Modal text, e.g. `BUY order placed for 2.5 ETH`.
    #[must_use]
    pub fn acknowledgment(&self) -> String {
        format!(
            "{} order placed for {} {}",
            self.action.as_str().to_uppercase(),
            self.amount,
            self.currency
        )
    }
}

/// Where reported intents go.
pub trait IntentReporter {
    /// Report one intent. Called once per buy or sell action.
    fn report(&self, intent: &TradeIntent);
}

/// Reports intents as structured log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl IntentReporter for TracingReporter {
    fn report(&self, intent: &TradeIntent) {
        tracing::info!(
            name: "trade.intent.reported",
            action = %intent.action,
            amount = %intent.amount,
            currency = %intent.currency,
            acknowledgment = %intent.acknowledgment(),
            "{}",
            intent.diagnostic()
        );
    }
}

/// Editable form state: free-text amount and a selected currency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeForm {
    amount: String,
    currency: Currency,
}

impl TradeForm {
    /// Empty amount with Bitcoin selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount as currently typed.
    #[must_use]
    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Currently selected currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Replace the amount with the input's new text.
    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount = amount.into();
    }

    /// Change the selected currency.
    pub fn select_currency(&mut self, currency: Currency) {
        self.currency = currency;
    }

    /// Build the intent from the current state and report it.
    ///
    /// The form itself is left untouched, so repeating the call reports the
    /// same intent again.
    pub fn invoke<R>(&self, action: TradeAction, reporter: &R) -> TradeIntent
    where
        R: IntentReporter + ?Sized,
    {
        let intent = TradeIntent {
            action,
            amount: self.amount.clone(),
            currency: self.currency,
        };
        reporter.report(&intent);
        intent
    }
}
