//! Arithmetic kernels for Integer, Decimal and Money.
//!
//! Kernels receive operands already widened to the operation's datatypes.
//! Integer arithmetic is checked; Decimal division rounds to the configured
//! scale; Money results are rounded to the currency's minor units.

use formula_core::{Decimal, ExecutionError, Money, NumericConfig, Value};

fn mismatch(operation: &str, operands: &[&Value]) -> ExecutionError {
    let found = operands
        .iter()
        .map(|v| v.datatype().name().to_string())
        .collect::<Vec<_>>()
        .join(" and ");
    ExecutionError::OperandMismatch {
        operation: operation.to_string(),
        found,
    }
}

fn overflow(operation: &str) -> ExecutionError {
    ExecutionError::Overflow {
        operation: operation.to_string(),
    }
}

fn integers(operation: &str, a: &Value, b: &Value) -> Result<(i64, i64), ExecutionError> {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Ok((*x, *y)),
        _ => Err(mismatch(operation, &[a, b])),
    }
}

fn decimals(operation: &str, a: &Value, b: &Value) -> Result<(Decimal, Decimal), ExecutionError> {
    match (a, b) {
        (Value::Decimal(x), Value::Decimal(y)) => Ok((*x, *y)),
        _ => Err(mismatch(operation, &[a, b])),
    }
}

fn monies<'v>(
    operation: &str,
    a: &'v Value,
    b: &'v Value,
) -> Result<(&'v Money, &'v Money), ExecutionError> {
    match (a, b) {
        (Value::Money(x), Value::Money(y)) => {
            x.ensure_same_currency(y)?;
            Ok((x, y))
        }
        _ => Err(mismatch(operation, &[a, b])),
    }
}

fn non_zero(divisor: Decimal) -> Result<Decimal, ExecutionError> {
    if divisor.is_zero() {
        Err(ExecutionError::DivisionByZero)
    } else {
        Ok(divisor)
    }
}

// =========================================
// Integer
// =========================================

pub(crate) fn integer_add(
    a: &Value,
    b: &Value,
    _: &NumericConfig,
) -> Result<Value, ExecutionError> {
    let (x, y) = integers("+", a, b)?;
    x.checked_add(y).map(Value::Integer).ok_or_else(|| overflow("Integer + Integer"))
}

pub(crate) fn integer_sub(
    a: &Value,
    b: &Value,
    _: &NumericConfig,
) -> Result<Value, ExecutionError> {
    let (x, y) = integers("-", a, b)?;
    x.checked_sub(y).map(Value::Integer).ok_or_else(|| overflow("Integer - Integer"))
}

pub(crate) fn integer_mul(
    a: &Value,
    b: &Value,
    _: &NumericConfig,
) -> Result<Value, ExecutionError> {
    let (x, y) = integers("*", a, b)?;
    x.checked_mul(y).map(Value::Integer).ok_or_else(|| overflow("Integer * Integer"))
}

// =========================================
// Decimal
// =========================================

pub(crate) fn decimal_add(
    a: &Value,
    b: &Value,
    _: &NumericConfig,
) -> Result<Value, ExecutionError> {
    let (x, y) = decimals("+", a, b)?;
    x.checked_add(y).map(Value::Decimal).ok_or_else(|| overflow("Decimal + Decimal"))
}

pub(crate) fn decimal_sub(
    a: &Value,
    b: &Value,
    _: &NumericConfig,
) -> Result<Value, ExecutionError> {
    let (x, y) = decimals("-", a, b)?;
    x.checked_sub(y).map(Value::Decimal).ok_or_else(|| overflow("Decimal - Decimal"))
}

pub(crate) fn decimal_mul(
    a: &Value,
    b: &Value,
    _: &NumericConfig,
) -> Result<Value, ExecutionError> {
    let (x, y) = decimals("*", a, b)?;
    x.checked_mul(y).map(Value::Decimal).ok_or_else(|| overflow("Decimal * Decimal"))
}

/// Quotient rounded to the configured decimal scale.
pub(crate) fn decimal_div(
    a: &Value,
    b: &Value,
    numeric: &NumericConfig,
) -> Result<Value, ExecutionError> {
    let (x, y) = decimals("/", a, b)?;
    let quotient = x
        .checked_div(non_zero(y)?)
        .ok_or_else(|| overflow("Decimal / Decimal"))?;
    numeric
        .round_decimal(quotient)
        .map(Value::Decimal)
        .ok_or_else(|| overflow("Decimal / Decimal"))
}

// =========================================
// Money
// =========================================

pub(crate) fn money_add(
    a: &Value,
    b: &Value,
    numeric: &NumericConfig,
) -> Result<Value, ExecutionError> {
    let (x, y) = monies("+", a, b)?;
    let sum = x
        .amount()
        .checked_add(y.amount())
        .ok_or_else(|| overflow("Money + Money"))?;
    Ok(Value::Money(x.with_amount(sum, numeric.rounding)))
}

pub(crate) fn money_sub(
    a: &Value,
    b: &Value,
    numeric: &NumericConfig,
) -> Result<Value, ExecutionError> {
    let (x, y) = monies("-", a, b)?;
    let difference = x
        .amount()
        .checked_sub(y.amount())
        .ok_or_else(|| overflow("Money - Money"))?;
    Ok(Value::Money(x.with_amount(difference, numeric.rounding)))
}

fn scale_money(
    money: &Money,
    factor: Decimal,
    numeric: &NumericConfig,
) -> Result<Value, ExecutionError> {
    let amount = money
        .amount()
        .checked_mul(factor)
        .ok_or_else(|| overflow("Money * Decimal"))?;
    Ok(Value::Money(money.with_amount(amount, numeric.rounding)))
}

pub(crate) fn money_mul_decimal(
    a: &Value,
    b: &Value,
    numeric: &NumericConfig,
) -> Result<Value, ExecutionError> {
    match (a, b) {
        (Value::Money(money), Value::Decimal(factor)) => scale_money(money, *factor, numeric),
        _ => Err(mismatch("*", &[a, b])),
    }
}

pub(crate) fn decimal_mul_money(
    a: &Value,
    b: &Value,
    numeric: &NumericConfig,
) -> Result<Value, ExecutionError> {
    match (a, b) {
        (Value::Decimal(factor), Value::Money(money)) => scale_money(money, *factor, numeric),
        _ => Err(mismatch("*", &[a, b])),
    }
}

/// Quotient rounded to the currency's minor units.
pub(crate) fn money_div_decimal(
    a: &Value,
    b: &Value,
    numeric: &NumericConfig,
) -> Result<Value, ExecutionError> {
    let (Value::Money(money), Value::Decimal(divisor)) = (a, b) else {
        return Err(mismatch("/", &[a, b]));
    };
    let amount = money
        .amount()
        .checked_div(non_zero(*divisor)?)
        .ok_or_else(|| overflow("Money / Decimal"))?;
    Ok(Value::Money(money.with_amount(amount, numeric.rounding)))
}

/// Ratio of two amounts in the same currency.
pub(crate) fn money_div_money(
    a: &Value,
    b: &Value,
    numeric: &NumericConfig,
) -> Result<Value, ExecutionError> {
    let (x, y) = monies("/", a, b)?;
    let ratio = x
        .amount()
        .checked_div(non_zero(y.amount())?)
        .ok_or_else(|| overflow("Money / Money"))?;
    numeric
        .round_decimal(ratio)
        .map(Value::Decimal)
        .ok_or_else(|| overflow("Money / Money"))
}

// =========================================
// Unary
// =========================================

pub(crate) fn negate(a: &Value, numeric: &NumericConfig) -> Result<Value, ExecutionError> {
    match a {
        Value::Integer(i) => i
            .checked_neg()
            .map(Value::Integer)
            .ok_or_else(|| overflow("-Integer")),
        Value::Decimal(d) => Ok(Value::Decimal(-*d)),
        Value::Money(m) => Ok(Value::Money(m.with_amount(-m.amount(), numeric.rounding))),
        _ => Err(mismatch("-", &[a])),
    }
}

pub(crate) fn identity(a: &Value, _: &NumericConfig) -> Result<Value, ExecutionError> {
    match a {
        Value::Integer(_) | Value::Decimal(_) | Value::Money(_) => Ok(a.clone()),
        _ => Err(mismatch("+", &[a])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formula_core::{Currency, RoundingMode};
    use std::str::FromStr;

    fn dec(text: &str) -> Value {
        Value::Decimal(Decimal::from_str(text).unwrap())
    }

    fn money(text: &str, code: &str) -> Value {
        let currency = Currency::from_code(code).unwrap();
        Value::Money(Money::new(
            Decimal::from_str(text).unwrap(),
            currency,
            RoundingMode::HalfUp,
        ))
    }

    #[test]
    fn integer_overflow_is_an_error() {
        let numeric = NumericConfig::default();
        let err = integer_add(&Value::Integer(i64::MAX), &Value::Integer(1), &numeric).unwrap_err();
        assert!(matches!(err, ExecutionError::Overflow { .. }));
        let err =
            integer_mul(&Value::Integer(i64::MIN), &Value::Integer(-1), &numeric).unwrap_err();
        assert!(matches!(err, ExecutionError::Overflow { .. }));
        assert!(negate(&Value::Integer(i64::MIN), &numeric).is_err());
    }

    #[test]
    fn decimal_division_rounds_to_scale() {
        let numeric = NumericConfig::default();
        let result = decimal_div(&dec("10.8"), &dec("4.2"), &numeric).unwrap();
        assert_eq!(result.to_string(), "2.5714285714");
        let result = decimal_div(&dec("10"), &dec("4"), &numeric).unwrap();
        assert_eq!(result.to_string(), "2.5000000000");
    }

    #[test]
    fn division_that_cannot_keep_its_scale_overflows() {
        let numeric = NumericConfig::default();
        let large = dec("100000000000000000000.0");
        let err = decimal_div(&large, &dec("1.0"), &numeric).unwrap_err();
        assert!(matches!(err, ExecutionError::Overflow { .. }));
        let result = decimal_div(&dec("1000000000000000000.0"), &dec("1.0"), &numeric).unwrap();
        assert_eq!(result.to_string(), "1000000000000000000.0000000000");
    }

    #[test]
    fn division_by_zero() {
        let numeric = NumericConfig::default();
        assert_eq!(
            decimal_div(&dec("1"), &dec("0"), &numeric).unwrap_err(),
            ExecutionError::DivisionByZero
        );
        assert_eq!(
            money_div_decimal(&money("1", "EUR"), &dec("0.00"), &numeric).unwrap_err(),
            ExecutionError::DivisionByZero
        );
        assert_eq!(
            money_div_money(&money("1", "EUR"), &money("0", "EUR"), &numeric).unwrap_err(),
            ExecutionError::DivisionByZero
        );
    }

    #[test]
    fn money_division_rounds_to_minor_units() {
        let numeric = NumericConfig::default();
        let result = money_div_decimal(&money("10.80", "EUR"), &dec("4.2"), &numeric).unwrap();
        assert_eq!(result.to_string(), "2.57EUR");
        let result = money_div_decimal(&money("1000", "JPY"), &dec("3"), &numeric).unwrap();
        assert_eq!(result.to_string(), "333JPY");
    }

    #[test]
    fn money_ratio_is_decimal() {
        let numeric = NumericConfig::default();
        let result = money_div_money(&money("3", "EUR"), &money("4", "EUR"), &numeric).unwrap();
        assert_eq!(result, dec("0.75"));
    }

    #[test]
    fn money_requires_same_currency() {
        let numeric = NumericConfig::default();
        let err = money_add(&money("1", "EUR"), &money("1", "USD"), &numeric).unwrap_err();
        assert!(matches!(err, ExecutionError::CurrencyMismatch { .. }));
    }

    #[test]
    fn scaling_money_keeps_currency() {
        let numeric = NumericConfig::default();
        let result = decimal_mul_money(&dec("1.5"), &money("2.25", "USD"), &numeric).unwrap();
        assert_eq!(result.to_string(), "3.38USD");
        let result = money_mul_decimal(&money("2.25", "USD"), &dec("1.5"), &numeric).unwrap();
        assert_eq!(result.to_string(), "3.38USD");
    }

    #[test]
    fn kernels_reject_unexpected_operands() {
        let numeric = NumericConfig::default();
        let err = integer_add(&dec("1"), &Value::Integer(1), &numeric).unwrap_err();
        assert_eq!(
            err,
            ExecutionError::OperandMismatch {
                operation: "+".into(),
                found: "Decimal and Integer".into(),
            }
        );
        assert!(identity(&Value::Boolean(true), &numeric).is_err());
    }
}
