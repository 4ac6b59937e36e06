//! IF, NOT, AND and OR.

use formula_core::{
    BinaryOp, CompilationResult, ConditionalNode, Datatype, ExecutionError, Fragment,
    MessageCode, NativeFunction, NumericConfig, ShortCircuitNode, Value,
};

use super::{Call, common_datatype};

pub(super) fn if_then_else(call: &Call<'_>) -> CompilationResult {
    if let Err(failed) = call.check_count(3) {
        return failed;
    }
    let types = call.types();
    if types[0] != Datatype::Boolean {
        return call.wrong_types();
    }
    let Some(common) = common_datatype(&types[1], &types[2]) else {
        return call.wrong_types();
    };

    let node = ConditionalNode {
        condition: call.arg_as(0, &Datatype::Boolean),
        then: call.arg_as(1, &common),
        otherwise: call.arg_as(2, &common),
    };
    CompilationResult::new(Fragment::Conditional(Box::new(node)), common)
}

pub(super) fn not(call: &Call<'_>) -> CompilationResult {
    if let Err(failed) = call.check_count(1) {
        return failed;
    }
    if call.types()[0] != Datatype::Boolean {
        return call.wrong_types();
    }
    call.native(
        NativeFunction::new("NOT", not_value),
        &[Datatype::Boolean],
        Datatype::Boolean,
    )
}

/// `AND(a; b; c)` compiles like `a && b && c`.
pub(super) fn and_or(call: &Call<'_>) -> CompilationResult {
    if call.args.is_empty() {
        return call.fail(
            MessageCode::WrongArgumentCount,
            format!("{} expects at least 1 argument, got 0", call.name),
        );
    }
    if call.types().iter().any(|t| *t != Datatype::Boolean) {
        return call.wrong_types();
    }

    let op = if call.name == "AND" {
        BinaryOp::And
    } else {
        BinaryOp::Or
    };
    let fragment = (1..call.args.len()).fold(call.arg_as(0, &Datatype::Boolean), |left, i| {
        Fragment::ShortCircuit(Box::new(ShortCircuitNode {
            op,
            left,
            right: call.arg_as(i, &Datatype::Boolean),
        }))
    });
    CompilationResult::new(fragment, Datatype::Boolean)
}

fn not_value(args: &[Value], _: &NumericConfig) -> Result<Value, ExecutionError> {
    match args {
        [Value::Boolean(b)] => Ok(Value::Boolean(!b)),
        _ => Err(ExecutionError::Function {
            name: "NOT".into(),
            message: "expects a Boolean".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::tests::resolve;
    use formula_core::{Decimal, EnumValue};

    fn constant(value: impl Into<Value>) -> CompilationResult {
        CompilationResult::constant(value.into())
    }

    #[test]
    fn if_uses_common_datatype() {
        let args = vec![constant(true), constant(1i64), constant(Decimal::new(25, 1))];
        let result = resolve("IF", args);
        assert_eq!(result.datatype(), Some(&Datatype::Decimal));
        let Fragment::Conditional(node) = result.fragment() else {
            panic!("expected conditional");
        };
        assert!(matches!(node.then, Fragment::Coerce { .. }));
        assert!(matches!(node.otherwise, Fragment::Const(_)));
    }

    #[test]
    fn if_on_enum_values() {
        let male = constant(EnumValue::new("Gender", "MALE"));
        let female = constant(EnumValue::new("Gender", "FEMALE"));
        let result = resolve("if", vec![constant(false), male, female]);
        assert_eq!(result.datatype(), Some(&Datatype::enumeration("Gender")));
    }

    #[test]
    fn if_rejects_unrelated_branches_and_non_boolean_condition() {
        let result = resolve("IF", vec![constant(true), constant(1i64), constant("one")]);
        assert_eq!(result.messages().codes(), vec![MessageCode::WrongArgumentTypes]);
        let result = resolve("IF", vec![constant(1i64), constant(1i64), constant(2i64)]);
        assert_eq!(result.messages().codes(), vec![MessageCode::WrongArgumentTypes]);
    }

    #[test]
    fn and_folds_into_short_circuit_chain() {
        let result = resolve("AND", vec![constant(true), constant(false), constant(true)]);
        let Fragment::ShortCircuit(outer) = result.fragment() else {
            panic!("expected short circuit");
        };
        assert_eq!(outer.op, BinaryOp::And);
        assert!(matches!(outer.left, Fragment::ShortCircuit(_)));

        let single = resolve("OR", vec![constant(true)]);
        assert!(matches!(single.fragment(), Fragment::Const(Value::Boolean(true))));

        let none = resolve("OR", vec![]);
        assert_eq!(none.messages().codes(), vec![MessageCode::WrongArgumentCount]);
    }

    #[test]
    fn not_negates() {
        let result = resolve("NOT", vec![constant(true)]);
        assert_eq!(result.datatype(), Some(&Datatype::Boolean));
        let negated = not_value(&[Value::Boolean(true)], &NumericConfig::default());
        assert_eq!(negated, Ok(Value::Boolean(false)));
    }
}
