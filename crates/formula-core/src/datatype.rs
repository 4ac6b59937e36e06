//! The datatype catalog of the formula language.
//!
//! The catalog is closed: every value an expression can produce has one of
//! the [`Datatype`] variants below. Implicit widening between datatypes is a
//! strict partial order:
//!
//! ```text
//! int ──► Integer ──► Decimal ──► Money
//! boolean ──► Boolean
//! ```
//!
//! String and enum datatypes never coerce. The operation registry walks these
//! chains to find an operation when no exact match is registered.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::currency::{Currency, Money};
use crate::error::LiteralError;
use crate::settings::Locale;
use crate::value::{EnumValue, Value};

/// A value type of the formula language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Datatype {
    /// Boxed integer (`Integer`).
    Integer,
    /// Primitive integer (`int`); widens to [`Datatype::Integer`].
    PrimitiveInteger,
    /// Arbitrary-precision fixed-point number.
    Decimal,
    /// Amount with an ISO currency.
    Money,
    /// Boxed boolean (`Boolean`).
    Boolean,
    /// Primitive boolean (`boolean`); widens to [`Datatype::Boolean`].
    PrimitiveBoolean,
    /// Text.
    String,
    /// Member of the named enumeration type.
    Enum(String),
}

impl Datatype {
    /// Datatypes with built-in literal syntax, in catalog order.
    pub const BUILTIN: [Datatype; 7] = [
        Datatype::Integer,
        Datatype::PrimitiveInteger,
        Datatype::Decimal,
        Datatype::Money,
        Datatype::Boolean,
        Datatype::PrimitiveBoolean,
        Datatype::String,
    ];

    /// Enumeration datatype for the given enum type id.
    pub fn enumeration(id: impl Into<String>) -> Self {
        Datatype::Enum(id.into())
    }

    /// Display name of the datatype.
    pub fn name(&self) -> &str {
        match self {
            Datatype::Integer => "Integer",
            Datatype::PrimitiveInteger => "int",
            Datatype::Decimal => "Decimal",
            Datatype::Money => "Money",
            Datatype::Boolean => "Boolean",
            Datatype::PrimitiveBoolean => "boolean",
            Datatype::String => "String",
            Datatype::Enum(id) => id,
        }
    }

    /// The datatype this one implicitly widens to in a single step.
    fn widens_to(&self) -> Option<Datatype> {
        match self {
            Datatype::PrimitiveInteger => Some(Datatype::Integer),
            Datatype::Integer => Some(Datatype::Decimal),
            Datatype::Decimal => Some(Datatype::Money),
            Datatype::PrimitiveBoolean => Some(Datatype::Boolean),
            _ => None,
        }
    }

    /// Datatypes reachable by one implicit coercion step.
    pub fn coercion_targets(&self) -> Vec<Datatype> {
        self.widens_to().into_iter().collect()
    }

    /// Every datatype this one can be used as, paired with the coercion
    /// distance, starting with itself at distance 0.
    pub fn widenings(&self) -> Vec<(Datatype, u32)> {
        let mut chain = vec![(self.clone(), 0)];
        let mut current = self.clone();
        while let Some(next) = current.widens_to() {
            let distance = chain.len() as u32;
            chain.push((next.clone(), distance));
            current = next;
        }
        chain
    }

    /// Number of coercion steps from `self` to `target`, if reachable.
    pub fn coercion_distance(&self, target: &Datatype) -> Option<u32> {
        self.widenings()
            .into_iter()
            .find(|(datatype, _)| datatype == target)
            .map(|(_, distance)| distance)
    }

    /// Whether a value of `self` may be used where `target` is expected.
    pub fn can_coerce_to(&self, target: &Datatype) -> bool {
        self.coercion_distance(target).is_some()
    }

    /// Whether widening to `target` needs the currency of another operand.
    ///
    /// Scalars only become Money when combined with a Money operand.
    pub fn coercion_needs_currency(&self, target: &Datatype) -> bool {
        *target == Datatype::Money && *self != Datatype::Money
    }

    /// The boxed counterpart of a primitive datatype, `self` otherwise.
    pub fn boxed(&self) -> Datatype {
        match self {
            Datatype::PrimitiveInteger => Datatype::Integer,
            Datatype::PrimitiveBoolean => Datatype::Boolean,
            other => other.clone(),
        }
    }

    /// Whether this is one of Integer, int, Decimal or Money.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Datatype::Integer | Datatype::PrimitiveInteger | Datatype::Decimal | Datatype::Money
        )
    }

    /// Whether this is Boolean or boolean.
    pub fn is_boolean(&self) -> bool {
        matches!(self, Datatype::Boolean | Datatype::PrimitiveBoolean)
    }

    /// Whether this is a primitive (unboxed) datatype.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Datatype::PrimitiveInteger | Datatype::PrimitiveBoolean)
    }

    /// The narrowest datatype both `self` and `other` widen to.
    pub fn common_supertype(&self, other: &Datatype) -> Option<Datatype> {
        self.widenings()
            .into_iter()
            .map(|(datatype, _)| datatype)
            .find(|datatype| other.can_coerce_to(datatype))
    }

    /// Parse literal text written in `locale` into a value of this datatype.
    pub fn parse_literal(&self, text: &str, locale: &Locale) -> Result<Value, LiteralError> {
        match self {
            Datatype::Integer | Datatype::PrimitiveInteger => {
                let normalized = normalize_number(text, locale, self, false)?;
                normalized
                    .parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|_| self.out_of_range(text))
            }
            Datatype::Decimal => parse_decimal(text, locale, self).map(Value::Decimal),
            Datatype::Money => parse_money(text, locale).map(Value::Money),
            Datatype::Boolean | Datatype::PrimitiveBoolean => {
                if text.eq_ignore_ascii_case("true") {
                    Ok(Value::Boolean(true))
                } else if text.eq_ignore_ascii_case("false") {
                    Ok(Value::Boolean(false))
                } else {
                    Err(self.malformed(text))
                }
            }
            Datatype::String => unquote(text)
                .map(Value::String)
                .ok_or_else(|| self.malformed(text)),
            Datatype::Enum(id) => {
                let member = text
                    .strip_prefix(id.as_str())
                    .and_then(|rest| rest.strip_prefix('.'))
                    .unwrap_or(text);
                let valid = member.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
                    && member.chars().all(|c| c.is_alphanumeric() || c == '_');
                if valid {
                    Ok(Value::Enum(EnumValue::new(id.clone(), member)))
                } else {
                    Err(self.malformed(text))
                }
            }
        }
    }

    /// Format `value` as literal text in `locale`.
    ///
    /// The output parses back with [`parse_literal`](Self::parse_literal) of
    /// the value's own datatype.
    pub fn format_value(&self, value: &Value, locale: &Locale) -> String {
        value.to_literal(locale)
    }

    fn malformed(&self, text: &str) -> LiteralError {
        LiteralError::Malformed {
            text: text.to_string(),
            datatype: self.name().to_string(),
        }
    }

    fn out_of_range(&self, text: &str) -> LiteralError {
        LiteralError::OutOfRange {
            text: text.to_string(),
            datatype: self.name().to_string(),
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rewrite locale-formatted number text into `-?digits(.digits)?`.
///
/// Grouping separators are only accepted between two digits of the integer
/// part; a decimal separator needs digits on both sides.
fn normalize_number(
    text: &str,
    locale: &Locale,
    datatype: &Datatype,
    allow_fraction: bool,
) -> Result<String, LiteralError> {
    let malformed = || datatype.malformed(text);
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut seen_separator = false;

    for (i, &c) in chars.iter().enumerate() {
        let prev_digit = i > 0 && chars[i - 1].is_ascii_digit();
        let next_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());

        if c.is_ascii_digit() {
            out.push(c);
        } else if c == '-' && i == 0 && next_digit {
            out.push('-');
        } else if c == locale.decimal_separator && allow_fraction && !seen_separator {
            if !prev_digit || !next_digit {
                return Err(malformed());
            }
            seen_separator = true;
            out.push('.');
        } else if Some(c) == locale.grouping_separator
            && !seen_separator
            && prev_digit
            && next_digit
        {
            continue;
        } else {
            return Err(malformed());
        }
    }

    if !out.bytes().any(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    Ok(out)
}

fn parse_decimal(
    text: &str,
    locale: &Locale,
    datatype: &Datatype,
) -> Result<Decimal, LiteralError> {
    let normalized = normalize_number(text, locale, datatype, true)?;
    Decimal::from_str(&normalized).map_err(|_| datatype.out_of_range(text))
}

fn parse_money(text: &str, locale: &Locale) -> Result<Money, LiteralError> {
    let split = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_alphabetic())
        .last()
        .map(|(i, _)| i);

    let (amount_text, code) = match split {
        Some(i) if text.len() - i == 3 && i > 0 => text.split_at(i),
        _ => return Err(Datatype::Money.malformed(text)),
    };

    let amount = parse_decimal(amount_text, locale, &Datatype::Money)?;
    let currency = Currency::from_code(code).ok_or_else(|| LiteralError::UnknownCurrency {
        code: code.to_string(),
    })?;

    Money::exact(amount, currency).ok_or_else(|| LiteralError::TooManyFractionDigits {
        text: text.to_string(),
        currency: code.to_string(),
        allowed: currency.minor_units(),
    })
}

/// Strip the quotes of a string literal and resolve `\"` and `\\`.
fn unquote(text: &str) -> Option<String> {
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                escaped @ ('"' | '\\') => out.push(escaped),
                _ => return None,
            },
            '"' => return None,
            c => out.push(c),
        }
    }
    Some(out)
}

/// Quote `text` as a string literal.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
