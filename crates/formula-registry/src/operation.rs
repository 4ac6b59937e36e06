//! Operation descriptors.
//!
//! A descriptor binds an operator and its operand datatypes to a result
//! datatype and a kernel. Given the compiled operands, [`BinaryOperation::compile`]
//! and [`UnaryOperation::compile`] produce the compiled operation, inserting
//! the coercions from the operands' datatypes to the descriptor's.

use std::fmt;

use formula_core::{
    BinaryKernel, BinaryNode, BinaryOp, CompilationResult, Datatype, Fragment, NumericConfig,
    ShortCircuitNode, UnaryKernel, UnaryNode, UnaryOp,
};

/// How a binary operation turns its operands into code.
#[derive(Clone, Copy)]
pub enum BinaryBuilder {
    /// Evaluate both operands, then call the kernel.
    Kernel(BinaryKernel),
    /// Evaluate the right operand only when the left does not decide the
    /// result (`&&`, `||`).
    ShortCircuit,
}

impl fmt::Debug for BinaryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryBuilder::Kernel(_) => f.write_str("Kernel"),
            BinaryBuilder::ShortCircuit => f.write_str("ShortCircuit"),
        }
    }
}

/// A registered binary operation.
#[derive(Debug, Clone)]
pub struct BinaryOperation {
    pub op: BinaryOp,
    pub left: Datatype,
    pub right: Datatype,
    pub result: Datatype,
    pub builder: BinaryBuilder,
}

impl BinaryOperation {
    /// Operation evaluated by `kernel`.
    pub fn new(
        op: BinaryOp,
        left: Datatype,
        right: Datatype,
        result: Datatype,
        kernel: BinaryKernel,
    ) -> Self {
        Self {
            op,
            left,
            right,
            result,
            builder: BinaryBuilder::Kernel(kernel),
        }
    }

    /// Short-circuit logical operation on two booleans.
    pub fn short_circuit(op: BinaryOp) -> Self {
        Self {
            op,
            left: Datatype::Boolean,
            right: Datatype::Boolean,
            result: Datatype::Boolean,
            builder: BinaryBuilder::ShortCircuit,
        }
    }

    /// Combine two compiled operands into the compiled operation.
    ///
    /// Both inputs are consumed. If either failed, the result fails with the
    /// messages of both; otherwise the operands are widened to this
    /// operation's operand datatypes and the messages of both are kept.
    pub fn compile(
        &self,
        left: CompilationResult,
        right: CompilationResult,
        numeric: &NumericConfig,
    ) -> CompilationResult {
        let (left_fragment, left_type, left_messages) = left.into_parts();
        let (right_fragment, right_type, right_messages) = right.into_parts();

        let mut messages = left_messages;
        messages.append(right_messages);

        let (Some(left_type), Some(right_type)) = (left_type, right_type) else {
            return CompilationResult::from_messages(messages);
        };
        if messages.contains_error_msg() {
            return CompilationResult::from_messages(messages);
        }

        let fragment = match self.builder {
            BinaryBuilder::Kernel(kernel) => Fragment::Binary(Box::new(BinaryNode {
                op: self.op,
                kernel,
                left: left_fragment,
                right: right_fragment,
                left_coercion: coercion(&left_type, &self.left),
                right_coercion: coercion(&right_type, &self.right),
                numeric: *numeric,
            })),
            BinaryBuilder::ShortCircuit => Fragment::ShortCircuit(Box::new(ShortCircuitNode {
                op: self.op,
                left: left_fragment.coerced(&left_type, &self.left),
                right: right_fragment.coerced(&right_type, &self.right),
            })),
        };

        CompilationResult::new(fragment, self.result.clone()).with_messages(messages)
    }
}

impl fmt::Display for BinaryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} -> {}", self.left, self.op, self.right, self.result)
    }
}

/// A registered unary operation.
#[derive(Debug, Clone)]
pub struct UnaryOperation {
    pub op: UnaryOp,
    pub operand: Datatype,
    pub result: Datatype,
    pub kernel: UnaryKernel,
}

impl UnaryOperation {
    pub fn new(op: UnaryOp, operand: Datatype, result: Datatype, kernel: UnaryKernel) -> Self {
        Self {
            op,
            operand,
            result,
            kernel,
        }
    }

    /// Apply this operation to a compiled operand.
    pub fn compile(
        &self,
        operand: CompilationResult,
        numeric: &NumericConfig,
    ) -> CompilationResult {
        let (fragment, datatype, messages) = operand.into_parts();
        let Some(datatype) = datatype.filter(|_| !messages.contains_error_msg()) else {
            return CompilationResult::from_messages(messages);
        };

        let node = UnaryNode {
            op: self.op,
            kernel: self.kernel,
            operand: fragment,
            operand_coercion: coercion(&datatype, &self.operand),
            numeric: *numeric,
        };
        CompilationResult::new(Fragment::Unary(Box::new(node)), self.result.clone())
            .with_messages(messages)
    }
}

impl fmt::Display for UnaryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} -> {}", self.op, self.operand, self.result)
    }
}

/// The runtime widening needed to use a value of `from` as `to`.
fn coercion(from: &Datatype, to: &Datatype) -> Option<Datatype> {
    (from.boxed() != to.boxed()).then(|| to.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formula_core::{Message, MessageCode, Value};

    fn int(i: i64) -> CompilationResult {
        CompilationResult::constant(Value::Integer(i))
    }

    fn add(a: &Value, b: &Value, _: &NumericConfig) -> Result<Value, formula_core::ExecutionError> {
        match (a, b) {
            (Value::Decimal(a), Value::Decimal(b)) => Ok(Value::Decimal(a + b)),
            _ => unreachable!(),
        }
    }

    fn decimal_add() -> BinaryOperation {
        BinaryOperation::new(
            BinaryOp::Add,
            Datatype::Decimal,
            Datatype::Decimal,
            Datatype::Decimal,
            add,
        )
    }

    #[test]
    fn compile_inserts_operand_coercions() {
        let result = decimal_add().compile(
            int(1),
            CompilationResult::constant(Value::Decimal(2.into())),
            &NumericConfig::default(),
        );
        assert!(result.succeeded());
        assert_eq!(result.datatype(), Some(&Datatype::Decimal));
        let Fragment::Binary(node) = result.fragment() else {
            panic!("expected binary node, got {:?}", result.fragment());
        };
        assert_eq!(node.left_coercion, Some(Datatype::Decimal));
        assert_eq!(node.right_coercion, None);
    }

    #[test]
    fn compile_keeps_messages_of_both_operands() {
        let warning = Message::warning(MessageCode::InvalidLiteral, "lossy");
        let left = int(1).with_message(warning.clone());
        let right = int(2).with_message(warning);
        let result = decimal_add().compile(left, right, &NumericConfig::default());
        assert!(result.succeeded());
        assert_eq!(result.messages().len(), 2);
    }

    #[test]
    fn compile_of_failed_operand_fails() {
        let failed = CompilationResult::failed(Message::error(
            MessageCode::UndefinedIdentifier,
            "unknown identifier 'x'",
        ));
        let result = decimal_add().compile(failed, int(2), &NumericConfig::default());
        assert!(result.failed_to_compile());
        assert!(result.fragment().is_invalid());
        assert_eq!(result.messages().codes(), vec![MessageCode::UndefinedIdentifier]);
    }

    #[test]
    fn short_circuit_builds_short_circuit_node() {
        let operation = BinaryOperation::short_circuit(BinaryOp::And);
        let t = CompilationResult::constant(Value::Boolean(true));
        let result = operation.compile(t.clone(), t, &NumericConfig::default());
        assert!(matches!(result.fragment(), Fragment::ShortCircuit(_)));
        assert_eq!(operation.to_string(), "Boolean && Boolean -> Boolean");
    }
}
