//! ISO 4217 currencies and money amounts.

use std::fmt;

use rust_decimal::Decimal;

use crate::error::ExecutionError;
use crate::settings::RoundingMode;

/// A recognized ISO 4217 currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Currency {
    code: &'static str,
    minor_units: u32,
}

/// Currencies money literals may use, with their minor-unit scale.
static CURRENCIES: &[Currency] = &[
    Currency::new("AUD", 2),
    Currency::new("BHD", 3),
    Currency::new("BRL", 2),
    Currency::new("CAD", 2),
    Currency::new("CHF", 2),
    Currency::new("CLP", 0),
    Currency::new("CNY", 2),
    Currency::new("CZK", 2),
    Currency::new("DKK", 2),
    Currency::new("EUR", 2),
    Currency::new("GBP", 2),
    Currency::new("HKD", 2),
    Currency::new("HUF", 2),
    Currency::new("INR", 2),
    Currency::new("ISK", 0),
    Currency::new("JOD", 3),
    Currency::new("JPY", 0),
    Currency::new("KRW", 0),
    Currency::new("KWD", 3),
    Currency::new("MXN", 2),
    Currency::new("NOK", 2),
    Currency::new("NZD", 2),
    Currency::new("OMR", 3),
    Currency::new("PLN", 2),
    Currency::new("SEK", 2),
    Currency::new("SGD", 2),
    Currency::new("TND", 3),
    Currency::new("TRY", 2),
    Currency::new("USD", 2),
    Currency::new("ZAR", 2),
];

impl Currency {
    const fn new(code: &'static str, minor_units: u32) -> Self {
        Self { code, minor_units }
    }

    /// Look up a currency by its upper-case ISO code.
    pub fn from_code(code: &str) -> Option<Currency> {
        CURRENCIES.iter().copied().find(|c| c.code == code)
    }

    /// The three-letter ISO code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Number of fractional digits of the currency (2 for EUR, 0 for JPY).
    pub fn minor_units(&self) -> u32 {
        self.minor_units
    }

    /// All recognized currencies.
    pub fn all() -> &'static [Currency] {
        CURRENCIES
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

/// An amount in a currency, always held at the currency's minor-unit scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Create a money value, rounding the amount to the currency's scale.
    pub fn new(amount: Decimal, currency: Currency, rounding: RoundingMode) -> Self {
        Self {
            amount: rounding.round(amount, currency.minor_units),
            currency,
        }
    }

    /// Create a money value from an amount that must already fit the currency.
    ///
    /// Returns `None` when rounding would be needed.
    pub fn exact(amount: Decimal, currency: Currency) -> Option<Self> {
        let scaled = RoundingMode::Down.round(amount, currency.minor_units);
        (scaled == amount).then_some(Self {
            amount: scaled,
            currency,
        })
    }

    /// The amount.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Same currency, different amount (rounded to the currency's scale).
    pub fn with_amount(&self, amount: Decimal, rounding: RoundingMode) -> Self {
        Self::new(amount, self.currency, rounding)
    }

    /// Check that `other` uses the same currency.
    pub fn ensure_same_currency(&self, other: &Money) -> Result<(), ExecutionError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(ExecutionError::CurrencyMismatch {
                left: self.to_string(),
                right: other.to_string(),
            })
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.currency)
    }
}
