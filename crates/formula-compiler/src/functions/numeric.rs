//! ABS, MIN, MAX, ROUND, ROUNDUP, ROUNDDOWN and WHOLENUMBER.

use std::cmp::Ordering;

use formula_core::rust_decimal::prelude::ToPrimitive;
use formula_core::settings::MAX_DECIMAL_SCALE;
use formula_core::{
    CompilationResult, Datatype, Decimal, ExecutionError, NativeFunction, NumericConfig,
    RoundingMode, Value,
};

use super::{Call, common_datatype};

pub(super) fn abs(call: &Call<'_>) -> CompilationResult {
    if let Err(failed) = call.check_count(1) {
        return failed;
    }
    match &call.types()[0] {
        datatype @ (Datatype::Integer | Datatype::Decimal | Datatype::Money) => call.native(
            NativeFunction::new("ABS", abs_value),
            std::slice::from_ref(datatype),
            datatype.clone(),
        ),
        _ => call.wrong_types(),
    }
}

pub(super) fn min_max(call: &Call<'_>, max: bool) -> CompilationResult {
    if let Err(failed) = call.check_count(2) {
        return failed;
    }
    let types = call.types();
    let common = common_datatype(&types[0], &types[1]).filter(Datatype::is_numeric);
    let Some(common) = common else {
        return call.wrong_types();
    };

    let function = if max {
        NativeFunction::new("MAX", max_value)
    } else {
        NativeFunction::new("MIN", min_value)
    };
    call.native(function, &[common.clone(), common.clone()], common)
}

pub(super) fn round(call: &Call<'_>) -> CompilationResult {
    if let Err(failed) = call.check_count(2) {
        return failed;
    }
    let types = call.types();
    let value_type = match &types[0] {
        Datatype::Integer | Datatype::Decimal => Datatype::Decimal,
        Datatype::Money => Datatype::Money,
        _ => return call.wrong_types(),
    };
    if types[1] != Datatype::Integer {
        return call.wrong_types();
    }

    let (name, mode) = match call.name {
        "ROUNDUP" => ("ROUNDUP", RoundingMode::Up),
        "ROUNDDOWN" => ("ROUNDDOWN", RoundingMode::Down),
        _ => ("ROUND", RoundingMode::HalfUp),
    };
    let function = NativeFunction::new(name, move |args: &[Value], _: &NumericConfig| {
        round_value(name, args, mode)
    });
    call.native(function, &[value_type.clone(), Datatype::Integer], value_type)
}

pub(super) fn whole_number(call: &Call<'_>) -> CompilationResult {
    if let Err(failed) = call.check_count(1) {
        return failed;
    }
    match &call.types()[0] {
        Datatype::Integer | Datatype::Decimal => call.native(
            NativeFunction::new("WHOLENUMBER", whole_number_value),
            &[Datatype::Decimal],
            Datatype::Integer,
        ),
        _ => call.wrong_types(),
    }
}

// =========================================
// Runtime
// =========================================

fn unexpected_arguments(name: &str, args: &[Value]) -> ExecutionError {
    let types: Vec<String> = args.iter().map(|v| v.datatype().to_string()).collect();
    ExecutionError::Function {
        name: name.to_string(),
        message: format!("unexpected arguments ({})", types.join(", ")),
    }
}

fn abs_value(args: &[Value], numeric: &NumericConfig) -> Result<Value, ExecutionError> {
    match args {
        [Value::Integer(i)] => i
            .checked_abs()
            .map(Value::Integer)
            .ok_or_else(|| ExecutionError::Overflow {
                operation: "ABS".into(),
            }),
        [Value::Decimal(d)] => Ok(Value::Decimal(d.abs())),
        [Value::Money(m)] => Ok(Value::Money(m.with_amount(m.amount().abs(), numeric.rounding))),
        _ => Err(unexpected_arguments("ABS", args)),
    }
}

fn compare(name: &str, args: &[Value]) -> Result<Ordering, ExecutionError> {
    match args {
        [Value::Integer(a), Value::Integer(b)] => Ok(a.cmp(b)),
        [Value::Decimal(a), Value::Decimal(b)] => Ok(a.cmp(b)),
        [Value::Money(a), Value::Money(b)] => {
            a.ensure_same_currency(b)?;
            Ok(a.amount().cmp(&b.amount()))
        }
        _ => Err(unexpected_arguments(name, args)),
    }
}

fn min_value(args: &[Value], _: &NumericConfig) -> Result<Value, ExecutionError> {
    let pick = if compare("MIN", args)?.is_le() { 0 } else { 1 };
    Ok(args[pick].clone())
}

fn max_value(args: &[Value], _: &NumericConfig) -> Result<Value, ExecutionError> {
    let pick = if compare("MAX", args)?.is_ge() { 0 } else { 1 };
    Ok(args[pick].clone())
}

fn round_value(name: &str, args: &[Value], mode: RoundingMode) -> Result<Value, ExecutionError> {
    let [value, Value::Integer(places)] = args else {
        return Err(unexpected_arguments(name, args));
    };
    let scale = u32::try_from(*places)
        .ok()
        .filter(|scale| *scale <= MAX_DECIMAL_SCALE)
        .ok_or_else(|| ExecutionError::Function {
            name: name.to_string(),
            message: format!(
                "number of decimal places must be between 0 and {MAX_DECIMAL_SCALE}, got {places}"
            ),
        })?;

    let rounded = |amount: Decimal| {
        mode.checked_round(amount, scale).ok_or_else(|| ExecutionError::Overflow {
            operation: name.to_string(),
        })
    };
    match value {
        Value::Decimal(d) => rounded(*d).map(Value::Decimal),
        Value::Money(m) => Ok(Value::Money(m.with_amount(rounded(m.amount())?, mode))),
        _ => Err(unexpected_arguments(name, args)),
    }
}

fn whole_number_value(args: &[Value], _: &NumericConfig) -> Result<Value, ExecutionError> {
    match args {
        [Value::Decimal(d)] => d
            .trunc()
            .to_i64()
            .map(Value::Integer)
            .ok_or_else(|| ExecutionError::Overflow {
                operation: "WHOLENUMBER".into(),
            }),
        _ => Err(unexpected_arguments("WHOLENUMBER", args)),
    }
}
