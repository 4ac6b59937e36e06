//! Compiler configuration: locale, numeric precision and recursion limits.
//!
//! Settings are plain serde structs so an embedding system can keep them in a
//! TOML file:
//!
//! ```
//! use formula_core::{CompilerSettings, RoundingMode};
//!
//! let settings = CompilerSettings::from_toml_str(r#"
//!     max_depth = 64
//!
//!     [locale]
//!     decimal_separator = ","
//!     grouping_separator = "."
//!
//!     [numeric]
//!     decimal_scale = 4
//!     rounding = "HALF_EVEN"
//! "#).unwrap();
//!
//! assert_eq!(settings.locale.argument_separator(), ';');
//! assert_eq!(settings.numeric.rounding, RoundingMode::HalfEven);
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Largest scale a `rust_decimal::Decimal` can represent.
pub const MAX_DECIMAL_SCALE: u32 = 28;

/// Locale-specific literal formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Locale {
    /// Separator between integer and fractional digits.
    pub decimal_separator: char,
    /// Optional separator between digit groups of the integer part.
    pub grouping_separator: Option<char>,
}

impl Locale {
    /// `1234.5`, no digit grouping.
    pub const ENGLISH: Locale = Locale {
        decimal_separator: '.',
        grouping_separator: None,
    };

    /// `1.234,5`.
    pub const GERMAN: Locale = Locale {
        decimal_separator: ',',
        grouping_separator: Some('.'),
    };

    /// Separator between function arguments.
    ///
    /// A comma decimal separator would make `MAX(1,5)` ambiguous, so such
    /// locales separate arguments with `;`.
    pub fn argument_separator(&self) -> char {
        if self.decimal_separator == ',' || self.grouping_separator == Some(',') {
            ';'
        } else {
            ','
        }
    }

    fn validate(&self) -> Result<(), SettingsError> {
        let reserved = |c: char| c.is_ascii_alphanumeric() || c.is_whitespace() || c == '"';
        if reserved(self.decimal_separator) {
            return Err(SettingsError::Invalid(format!(
                "'{}' cannot be used as decimal separator",
                self.decimal_separator
            )));
        }
        if let Some(grouping) = self.grouping_separator {
            if reserved(grouping) || grouping == self.decimal_separator {
                return Err(SettingsError::Invalid(format!(
                    "'{}' cannot be used as grouping separator",
                    grouping
                )));
            }
        }
        Ok(())
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::ENGLISH
    }
}

/// Rounding applied whenever a result has to be cut to a fixed scale.
///
/// Serialized with the conventional upper-case names (`HALF_UP`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingMode {
    /// Round half away from zero (`2.5 -> 3`, `-2.5 -> -3`).
    #[default]
    HalfUp,
    /// Round half towards zero.
    HalfDown,
    /// Round half to the nearest even digit.
    HalfEven,
    /// Always away from zero.
    Up,
    /// Always towards zero (truncate).
    Down,
    /// Towards positive infinity.
    Ceiling,
    /// Towards negative infinity.
    Floor,
}

impl RoundingMode {
    /// The equivalent `rust_decimal` strategy.
    pub fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfDown => RoundingStrategy::MidpointTowardZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingMode::Up => RoundingStrategy::AwayFromZero,
            RoundingMode::Down => RoundingStrategy::ToZero,
            RoundingMode::Ceiling => RoundingStrategy::ToPositiveInfinity,
            RoundingMode::Floor => RoundingStrategy::ToNegativeInfinity,
        }
    }

    /// Round `value` to exactly `scale` fractional digits.
    ///
    /// The result always carries `scale` digits, padding with zeros when the
    /// input is shorter (`2.5` at scale 3 becomes `2.500`).
    pub fn round(self, value: Decimal, scale: u32) -> Decimal {
        let mut rounded = value.round_dp_with_strategy(scale, self.strategy());
        rounded.rescale(scale);
        rounded
    }

    /// Like [`RoundingMode::round`], but `None` when the value has too many
    /// integer digits to carry `scale` fractional digits.
    pub fn checked_round(self, value: Decimal, scale: u32) -> Option<Decimal> {
        let rounded = self.round(value, scale);
        (rounded.scale() == scale).then_some(rounded)
    }
}

/// Fixed-point behaviour of Decimal arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericConfig {
    /// Fractional digits kept by Decimal division.
    pub decimal_scale: u32,
    /// Rounding used for Decimal division and Money results.
    pub rounding: RoundingMode,
}

impl NumericConfig {
    /// Default fractional scale of Decimal division.
    pub const DEFAULT_DECIMAL_SCALE: u32 = 10;

    /// Round a Decimal division result to the configured scale.
    ///
    /// `None` when the integer part leaves no room for that scale.
    pub fn round_decimal(&self, value: Decimal) -> Option<Decimal> {
        self.rounding.checked_round(value, self.decimal_scale)
    }
}

impl Default for NumericConfig {
    fn default() -> Self {
        Self {
            decimal_scale: Self::DEFAULT_DECIMAL_SCALE,
            rounding: RoundingMode::HalfUp,
        }
    }
}

/// Everything a compiler needs besides its registered operations and resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Literal format.
    pub locale: Locale,
    /// Decimal scale and rounding.
    pub numeric: NumericConfig,
    /// Maximum nesting of sub-expressions accepted by the parser.
    pub max_depth: u32,
}

impl CompilerSettings {
    /// Default nesting limit.
    pub const DEFAULT_MAX_DEPTH: u32 = 256;

    /// Parse and validate settings from TOML text. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        let settings: CompilerSettings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.locale.validate()?;
        if self.numeric.decimal_scale > MAX_DECIMAL_SCALE {
            return Err(SettingsError::Invalid(format!(
                "decimal_scale {} exceeds the maximum of {}",
                self.numeric.decimal_scale, MAX_DECIMAL_SCALE
            )));
        }
        if self.max_depth == 0 {
            return Err(SettingsError::Invalid("max_depth must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            numeric: NumericConfig::default(),
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn defaults() {
        let settings = CompilerSettings::default();
        assert_eq!(settings.locale, Locale::ENGLISH);
        assert_eq!(settings.numeric.decimal_scale, 10);
        assert_eq!(settings.numeric.rounding, RoundingMode::HalfUp);
        assert_eq!(settings.max_depth, 256);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let settings = CompilerSettings::from_toml_str("").unwrap();
        assert_eq!(settings, CompilerSettings::default());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let settings = CompilerSettings::from_toml_str("[numeric]\ndecimal_scale = 2\n").unwrap();
        assert_eq!(settings.numeric.decimal_scale, 2);
        assert_eq!(settings.numeric.rounding, RoundingMode::HalfUp);
        assert_eq!(settings.locale, Locale::ENGLISH);
    }

    #[test]
    fn rejects_oversized_scale() {
        let err = CompilerSettings::from_toml_str("[numeric]\ndecimal_scale = 40\n").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn rejects_clashing_separators() {
        let err = CompilerSettings::from_toml_str(
            "[locale]\ndecimal_separator = \",\"\ngrouping_separator = \",\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = CompilerSettings::from_toml_str("max_depth = \"deep\"").unwrap_err();
        assert!(matches!(err, SettingsError::Toml(_)));
    }

    #[test]
    fn argument_separator_follows_decimal_separator() {
        assert_eq!(Locale::ENGLISH.argument_separator(), ',');
        assert_eq!(Locale::GERMAN.argument_separator(), ';');
    }

    #[test]
    fn half_up_rounds_away_from_zero() {
        let d = Decimal::from_str("2.345").unwrap();
        assert_eq!(RoundingMode::HalfUp.round(d, 2).to_string(), "2.35");
        assert_eq!(RoundingMode::HalfUp.round(-d, 2).to_string(), "-2.35");
        assert_eq!(RoundingMode::HalfEven.round(d, 2).to_string(), "2.34");
        assert_eq!(RoundingMode::Down.round(d, 1).to_string(), "2.3");
    }

    #[test]
    fn round_pads_to_scale() {
        let d = Decimal::from_str("2.5").unwrap();
        let rounded = NumericConfig::default().round_decimal(d).unwrap();
        assert_eq!(rounded.to_string(), "2.5000000000");
    }

    #[test]
    fn scale_that_does_not_fit_is_refused() {
        let large = Decimal::from_str("100000000000000000000").unwrap();
        assert_eq!(NumericConfig::default().round_decimal(large), None);
        assert_eq!(RoundingMode::HalfUp.checked_round(large, 7).map(|d| d.scale()), Some(7));
        assert_eq!(RoundingMode::HalfUp.round(large, 10).scale(), 8);
    }
}
