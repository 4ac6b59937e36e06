//! The built-in operation table.
//!
//! Registration order matters: when several operations are reachable at the
//! same coercion distance, the one registered first is chosen.

mod arithmetic;
mod comparison;

use formula_core::{
    BinaryKernel, BinaryOp, Datatype, ExecutionError, NumericConfig, UnaryKernel, UnaryOp, Value,
};

use crate::operation::{BinaryOperation, UnaryOperation};
use crate::registry::OperationRegistry;

use arithmetic::*;
use comparison::*;

/// Datatypes with relational operators.
const ORDERED: [Datatype; 3] = [Datatype::Integer, Datatype::Decimal, Datatype::Money];

/// Datatypes with equality operators, besides registered enum types.
const EQUATABLE: [Datatype; 5] = [
    Datatype::Integer,
    Datatype::Decimal,
    Datatype::Money,
    Datatype::Boolean,
    Datatype::String,
];

/// Register every built-in operation into `registry`.
pub(crate) fn register(registry: &mut OperationRegistry) {
    use Datatype::{Boolean, Decimal, Integer, Money};

    let mut binary = |op, left, right, result, kernel: BinaryKernel| {
        registry.push_binary(BinaryOperation::new(op, left, right, result, kernel));
    };

    binary(BinaryOp::Add, Integer, Integer, Integer, integer_add);
    binary(BinaryOp::Sub, Integer, Integer, Integer, integer_sub);
    binary(BinaryOp::Mul, Integer, Integer, Integer, integer_mul);

    binary(BinaryOp::Add, Decimal, Decimal, Decimal, decimal_add);
    binary(BinaryOp::Sub, Decimal, Decimal, Decimal, decimal_sub);
    binary(BinaryOp::Mul, Decimal, Decimal, Decimal, decimal_mul);
    binary(BinaryOp::Div, Decimal, Decimal, Decimal, decimal_div);

    binary(BinaryOp::Add, Money, Money, Money, money_add);
    binary(BinaryOp::Sub, Money, Money, Money, money_sub);
    binary(BinaryOp::Mul, Money, Decimal, Money, money_mul_decimal);
    binary(BinaryOp::Mul, Decimal, Money, Money, decimal_mul_money);
    binary(BinaryOp::Div, Money, Decimal, Money, money_div_decimal);
    binary(BinaryOp::Div, Money, Money, Decimal, money_div_money);

    for datatype in ORDERED {
        binary(BinaryOp::Less, datatype.clone(), datatype.clone(), Boolean, less);
        binary(BinaryOp::LessEqual, datatype.clone(), datatype.clone(), Boolean, less_equal);
        binary(BinaryOp::Greater, datatype.clone(), datatype.clone(), Boolean, greater);
        binary(BinaryOp::GreaterEqual, datatype.clone(), datatype, Boolean, greater_equal);
    }
    for datatype in EQUATABLE {
        binary(BinaryOp::Equal, datatype.clone(), datatype.clone(), Boolean, equal);
        binary(BinaryOp::NotEqual, datatype.clone(), datatype, Boolean, not_equal);
    }

    // Scalars meet Money without adopting its currency, so no rounding
    // happens before the comparison.
    for (left, right) in [(Money, Decimal), (Decimal, Money)] {
        binary(BinaryOp::Less, left.clone(), right.clone(), Boolean, less);
        binary(BinaryOp::LessEqual, left.clone(), right.clone(), Boolean, less_equal);
        binary(BinaryOp::Greater, left.clone(), right.clone(), Boolean, greater);
        binary(BinaryOp::GreaterEqual, left.clone(), right.clone(), Boolean, greater_equal);
        binary(BinaryOp::Equal, left.clone(), right.clone(), Boolean, equal);
        binary(BinaryOp::NotEqual, left, right, Boolean, not_equal);
    }

    binary(
        BinaryOp::Add,
        Datatype::String,
        Datatype::String,
        Datatype::String,
        concat,
    );

    registry.push_binary(BinaryOperation::short_circuit(BinaryOp::And));
    registry.push_binary(BinaryOperation::short_circuit(BinaryOp::Or));

    let mut unary = |op, datatype: Datatype, kernel: UnaryKernel| {
        registry.push_unary(UnaryOperation::new(op, datatype.clone(), datatype, kernel));
    };
    for datatype in ORDERED {
        unary(UnaryOp::Neg, datatype.clone(), negate);
        unary(UnaryOp::Plus, datatype, identity);
    }
    unary(UnaryOp::Not, Boolean, not);
}

/// Equality operations for an enum datatype.
pub(crate) fn enum_equality(datatype: &Datatype) -> [BinaryOperation; 2] {
    let operation = |op, kernel: BinaryKernel| {
        BinaryOperation::new(op, datatype.clone(), datatype.clone(), Datatype::Boolean, kernel)
    };
    [
        operation(BinaryOp::Equal, equal),
        operation(BinaryOp::NotEqual, not_equal),
    ]
}

fn concat(a: &Value, b: &Value, _: &NumericConfig) -> Result<Value, ExecutionError> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Ok(Value::String(format!("{x}{y}"))),
        _ => Err(ExecutionError::OperandMismatch {
            operation: "+".into(),
            found: format!("{} and {}", a.datatype(), b.datatype()),
        }),
    }
}

fn not(a: &Value, _: &NumericConfig) -> Result<Value, ExecutionError> {
    match a {
        Value::Boolean(b) => Ok(Value::Boolean(!b)),
        _ => Err(ExecutionError::OperandMismatch {
            operation: "!".into(),
            found: a.datatype().to_string(),
        }),
    }
}
