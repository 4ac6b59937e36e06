//! Runtime values produced by evaluating compiled expressions.

use std::fmt;

use rust_decimal::Decimal;

use crate::currency::Money;
use crate::datatype::{Datatype, quote};
use crate::error::ExecutionError;
use crate::settings::{Locale, RoundingMode};

/// Member of an enumeration type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    /// Id of the enumeration type (e.g. `Gender`).
    pub enum_type: String,
    /// Member id (e.g. `MALE`).
    pub member: String,
}

impl EnumValue {
    /// Create an enum value.
    pub fn new(enum_type: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            enum_type: enum_type.into(),
            member: member.into(),
        }
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.enum_type, self.member)
    }
}

/// A typed runtime value, mirroring the datatype catalog.
///
/// Primitive and boxed datatypes share a representation; a value always
/// reports the boxed datatype.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Integer(i64),
    Decimal(Decimal),
    Money(Money),
    Boolean(bool),
    String(String),
    Enum(EnumValue),
}

impl Value {
    /// The datatype of this value.
    pub fn datatype(&self) -> Datatype {
        match self {
            Value::Integer(_) => Datatype::Integer,
            Value::Decimal(_) => Datatype::Decimal,
            Value::Money(_) => Datatype::Money,
            Value::Boolean(_) => Datatype::Boolean,
            Value::String(_) => Datatype::String,
            Value::Enum(e) => Datatype::Enum(e.enum_type.clone()),
        }
    }

    /// Whether the value may be bound where `datatype` was resolved.
    pub fn conforms_to(&self, datatype: &Datatype) -> bool {
        self.datatype() == datatype.boxed()
    }

    /// The boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric payload as a Decimal (Integer, Decimal or Money amount).
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Integer(i) => Some(Decimal::from(*i)),
            Value::Decimal(d) => Some(*d),
            Value::Money(m) => Some(m.amount()),
            _ => None,
        }
    }

    /// Widen this value to `target`.
    ///
    /// A scalar widened to Money takes the currency of `peer`, the Money
    /// operand it is being combined with.
    pub fn coerce_to(
        &self,
        target: &Datatype,
        peer: Option<&Value>,
        rounding: RoundingMode,
    ) -> Result<Value, ExecutionError> {
        let target = target.boxed();
        if self.datatype() == target {
            return Ok(self.clone());
        }

        match (self, &target) {
            (Value::Integer(i), Datatype::Decimal) => Ok(Value::Decimal(Decimal::from(*i))),
            (Value::Integer(_) | Value::Decimal(_), Datatype::Money) => match peer {
                Some(Value::Money(peer)) => {
                    let amount = self.as_decimal().unwrap_or_default();
                    Ok(Value::Money(peer.with_amount(amount, rounding)))
                }
                _ => Err(ExecutionError::Coercion {
                    from: self.to_string(),
                    to: target.to_string(),
                    reason: "no currency to adopt".into(),
                }),
            },
            _ => Err(ExecutionError::Coercion {
                from: self.to_string(),
                to: target.to_string(),
                reason: "not an implicit widening".into(),
            }),
        }
    }

    /// Literal text for this value in `locale`.
    pub fn to_literal(&self, locale: &Locale) -> String {
        let localize = |text: String| {
            if locale.decimal_separator == '.' {
                text
            } else {
                text.replace('.', &locale.decimal_separator.to_string())
            }
        };

        match self {
            Value::Integer(i) => i.to_string(),
            Value::Decimal(d) => localize(d.to_string()),
            Value::Money(m) => format!("{}{}", localize(m.amount().to_string()), m.currency()),
            Value::Boolean(b) => b.to_string(),
            Value::String(s) => quote(s),
            Value::Enum(e) => e.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Money(m) => write!(f, "{}", m),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => f.write_str(s),
            Value::Enum(e) => write!(f, "{}", e),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<Money> for Value {
    fn from(value: Money) -> Self {
        Value::Money(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<EnumValue> for Value {
    fn from(value: EnumValue) -> Self {
        Value::Enum(value)
    }
}
