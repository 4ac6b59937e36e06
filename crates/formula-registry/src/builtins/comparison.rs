//! Relational and equality kernels.

use std::cmp::Ordering;

use formula_core::{ExecutionError, NumericConfig, Value};

/// Order two numeric values.
///
/// Money amounts are only comparable within one currency. A scalar is
/// compared with the exact Money amount, never with a rounded one.
fn compare(operation: &str, a: &Value, b: &Value) -> Result<Ordering, ExecutionError> {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Ok(x.cmp(y)),
        (Value::Decimal(x), Value::Decimal(y)) => Ok(x.cmp(y)),
        (Value::Money(x), Value::Money(y)) => {
            x.ensure_same_currency(y)?;
            Ok(x.amount().cmp(&y.amount()))
        }
        (Value::Money(x), Value::Decimal(y)) => Ok(x.amount().cmp(y)),
        (Value::Decimal(x), Value::Money(y)) => Ok(x.cmp(&y.amount())),
        _ => Err(ExecutionError::OperandMismatch {
            operation: operation.to_string(),
            found: format!("{} and {}", a.datatype(), b.datatype()),
        }),
    }
}

pub(crate) fn less(a: &Value, b: &Value, _: &NumericConfig) -> Result<Value, ExecutionError> {
    compare("<", a, b).map(|o| Value::Boolean(o.is_lt()))
}

pub(crate) fn less_equal(a: &Value, b: &Value, _: &NumericConfig) -> Result<Value, ExecutionError> {
    compare("<=", a, b).map(|o| Value::Boolean(o.is_le()))
}

pub(crate) fn greater(a: &Value, b: &Value, _: &NumericConfig) -> Result<Value, ExecutionError> {
    compare(">", a, b).map(|o| Value::Boolean(o.is_gt()))
}

pub(crate) fn greater_equal(
    a: &Value,
    b: &Value,
    _: &NumericConfig,
) -> Result<Value, ExecutionError> {
    compare(">=", a, b).map(|o| Value::Boolean(o.is_ge()))
}

/// Value equality. Decimals compare numerically (`2.5 = 2.50`); money
/// amounts in different currencies are never equal.
fn same(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Money(m), Value::Decimal(d)) | (Value::Decimal(d), Value::Money(m)) => {
            m.amount() == *d
        }
        _ => a == b,
    }
}

pub(crate) fn equal(a: &Value, b: &Value, _: &NumericConfig) -> Result<Value, ExecutionError> {
    Ok(Value::Boolean(same(a, b)))
}

pub(crate) fn not_equal(a: &Value, b: &Value, _: &NumericConfig) -> Result<Value, ExecutionError> {
    Ok(Value::Boolean(!same(a, b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use formula_core::{Currency, Decimal, Money, RoundingMode};
    use std::str::FromStr;

    fn dec(text: &str) -> Value {
        Value::Decimal(Decimal::from_str(text).unwrap())
    }

    fn eur(text: &str) -> Value {
        let currency = Currency::from_code("EUR").unwrap();
        Value::Money(Money::new(Decimal::from_str(text).unwrap(), currency, RoundingMode::HalfUp))
    }

    #[test]
    fn relational_operators() {
        let n = NumericConfig::default();
        assert_eq!(less(&Value::Integer(1), &Value::Integer(2), &n), Ok(Value::Boolean(true)));
        assert_eq!(less_equal(&dec("2.50"), &dec("2.5"), &n), Ok(Value::Boolean(true)));
        assert_eq!(greater(&eur("3"), &eur("2.99"), &n), Ok(Value::Boolean(true)));
        assert_eq!(greater_equal(&dec("1"), &dec("1.1"), &n), Ok(Value::Boolean(false)));
    }

    #[test]
    fn equality_is_numeric_for_decimals() {
        let n = NumericConfig::default();
        assert_eq!(equal(&dec("2.5"), &dec("2.50"), &n), Ok(Value::Boolean(true)));
        assert_eq!(not_equal(&dec("2.5"), &dec("2.50"), &n), Ok(Value::Boolean(false)));
        assert_eq!(equal(&Value::from("a"), &Value::from("b"), &n), Ok(Value::Boolean(false)));
    }

    #[test]
    fn scalars_compare_with_exact_amount() {
        let n = NumericConfig::default();
        assert_eq!(less(&eur("3.50"), &dec("3.504"), &n), Ok(Value::Boolean(true)));
        assert_eq!(greater(&dec("3.504"), &eur("3.50"), &n), Ok(Value::Boolean(true)));
        assert_eq!(equal(&eur("10.00"), &dec("10.004"), &n), Ok(Value::Boolean(false)));
        assert_eq!(not_equal(&dec("10.004"), &eur("10.00"), &n), Ok(Value::Boolean(true)));
        assert_eq!(equal(&eur("10.00"), &dec("10"), &n), Ok(Value::Boolean(true)));
    }

    #[test]
    fn comparing_currencies_fails() {
        let usd = Value::Money(Money::new(
            Decimal::ONE,
            Currency::from_code("USD").unwrap(),
            RoundingMode::HalfUp,
        ));
        let n = NumericConfig::default();
        assert!(matches!(
            less(&eur("1"), &usd, &n),
            Err(ExecutionError::CurrencyMismatch { .. })
        ));
        assert_eq!(equal(&eur("1"), &usd, &n), Ok(Value::Boolean(false)));
    }

    #[test]
    fn comparing_non_numbers_fails() {
        let n = NumericConfig::default();
        assert!(less(&Value::from(true), &Value::from(false), &n).is_err());
    }
}
