//! Evaluation of compiled fragments.
//!
//! Evaluation is a recursive walk over the [`Fragment`] tree. Identifier
//! values come from [`Bindings`]; nothing is defaulted.

use std::borrow::Cow;

use formula_core::{
    BinaryNode, BinaryOp, CallNode, CompilationResult, ConditionalNode, Datatype, ExecutionError,
    Fragment, RoundingMode, ShortCircuitNode, UnaryNode, Value,
};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// Identifier values supplied to [`evaluate`], keyed by the full identifier name.
pub type Bindings = FxHashMap<String, Value>;

/// Evaluate a successful compilation result.
///
/// # Errors
///
/// [`ExecutionError::NotCompiled`] if the result carries errors. Missing or
/// mistyped bindings and arithmetic faults are reported the same way.
///
/// # Example
///
/// ```
/// use formula::{evaluate, Bindings};
/// use formula_compiler::Compiler;
/// use formula_core::{Datatype, Value};
///
/// let compiler = Compiler::builder()
///     .parameter("age", Datatype::Integer)
///     .build()
///     .unwrap();
/// let result = compiler.compile("age >= 18");
///
/// let mut bindings = Bindings::default();
/// bindings.insert("age".into(), Value::Integer(21));
/// assert_eq!(evaluate(&result, &bindings), Ok(Value::Boolean(true)));
/// ```
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn evaluate(result: &CompilationResult, bindings: &Bindings) -> Result<Value, ExecutionError> {
    if result.failed_to_compile() {
        return Err(ExecutionError::NotCompiled);
    }

    let evaluator = Evaluator { bindings };
    let outcome = evaluator.eval(result.fragment());
    match &outcome {
        Ok(value) => debug!(%value, "evaluated expression"),
        Err(error) => debug!(%error, "evaluation failed"),
    }
    outcome
}

struct Evaluator<'b> {
    bindings: &'b Bindings,
}

impl Evaluator<'_> {
    fn eval(&self, fragment: &Fragment) -> Result<Value, ExecutionError> {
        match fragment {
            Fragment::Const(value) => Ok(value.clone()),
            Fragment::Identifier { name, datatype } => self.identifier(name, datatype),
            Fragment::Coerce { to, operand } => {
                self.eval(operand)?.coerce_to(to, None, RoundingMode::default())
            }
            Fragment::Unary(node) => self.unary(node),
            Fragment::Binary(node) => self.binary(node),
            Fragment::ShortCircuit(node) => self.short_circuit(node),
            Fragment::Conditional(node) => self.conditional(node),
            Fragment::Call(node) => self.call(node),
            Fragment::Invalid => Err(ExecutionError::NotCompiled),
        }
    }

    fn identifier(&self, name: &str, datatype: &Datatype) -> Result<Value, ExecutionError> {
        let value = self
            .bindings
            .get(name)
            .ok_or_else(|| ExecutionError::MissingBinding { name: name.into() })?;
        if !value.conforms_to(datatype) {
            return Err(ExecutionError::BindingTypeMismatch {
                name: name.into(),
                expected: datatype.to_string(),
                found: value.datatype().to_string(),
            });
        }
        trace!(name, %value, "read binding");
        Ok(value.clone())
    }

    fn unary(&self, node: &UnaryNode) -> Result<Value, ExecutionError> {
        let operand = self.eval(&node.operand)?;
        let operand = match &node.operand_coercion {
            Some(to) => operand.coerce_to(to, None, node.numeric.rounding)?,
            None => operand,
        };
        (node.kernel)(&operand, &node.numeric)
    }

    /// Left-nested operator chains are walked with a loop, leftmost first.
    fn binary(&self, node: &BinaryNode) -> Result<Value, ExecutionError> {
        let mut spine = vec![node];
        let mut leftmost = &node.left;
        while let Fragment::Binary(inner) = leftmost {
            spine.push(inner.as_ref());
            leftmost = &inner.left;
        }

        let mut left = self.eval(leftmost)?;
        for node in spine.into_iter().rev() {
            let right = self.eval(&node.right)?;
            left = Self::apply(node, left, right)?;
        }
        Ok(left)
    }

    /// Both operands are evaluated before either is widened, so a scalar
    /// widened to Money can adopt the currency of the other side.
    fn apply(node: &BinaryNode, left: Value, right: Value) -> Result<Value, ExecutionError> {
        let rounding = node.numeric.rounding;

        let widened_left = match &node.left_coercion {
            Some(to) => Cow::Owned(left.coerce_to(to, Some(&right), rounding)?),
            None => Cow::Borrowed(&left),
        };
        let widened_right = match &node.right_coercion {
            Some(to) => Cow::Owned(right.coerce_to(to, Some(&left), rounding)?),
            None => Cow::Borrowed(&right),
        };
        (node.kernel)(&widened_left, &widened_right, &node.numeric)
    }

    fn short_circuit(&self, node: &ShortCircuitNode) -> Result<Value, ExecutionError> {
        let left = self.boolean(&node.left, node.op)?;
        let decided = match node.op {
            BinaryOp::And => !left,
            _ => left,
        };
        if decided {
            return Ok(Value::Boolean(left));
        }
        self.boolean(&node.right, node.op).map(Value::Boolean)
    }

    fn conditional(&self, node: &ConditionalNode) -> Result<Value, ExecutionError> {
        if self.boolean(&node.condition, "IF")? {
            self.eval(&node.then)
        } else {
            self.eval(&node.otherwise)
        }
    }

    fn call(&self, node: &CallNode) -> Result<Value, ExecutionError> {
        let args = node
            .args
            .iter()
            .map(|arg| self.eval(arg))
            .collect::<Result<Vec<_>, _>>()?;
        trace!(function = node.function.name(), args = args.len(), "calling function");
        node.function.call(&args, &node.numeric)
    }

    fn boolean(
        &self,
        fragment: &Fragment,
        operation: impl ToString,
    ) -> Result<bool, ExecutionError> {
        let value = self.eval(fragment)?;
        value.as_bool().ok_or_else(|| ExecutionError::OperandMismatch {
            operation: operation.to_string(),
            found: value.datatype().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formula_compiler::Compiler;
    use formula_core::{Currency, Decimal, Money};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn compiler() -> Compiler {
        Compiler::builder()
            .parameter("age", Datatype::PrimitiveInteger)
            .parameter("premium", Datatype::Money)
            .parameter("flag", Datatype::Boolean)
            .build()
            .unwrap()
    }

    fn run(text: &str, bindings: &Bindings) -> Result<Value, ExecutionError> {
        let result = compiler().compile(text);
        assert!(result.succeeded(), "{text}: {:?}", result.messages());
        evaluate(&result, bindings)
    }

    fn eur(amount: &str) -> Value {
        let currency = Currency::from_code("EUR").unwrap();
        Value::Money(Money::exact(Decimal::from_str(amount).unwrap(), currency).unwrap())
    }

    #[test]
    fn constants() {
        let bindings = Bindings::default();
        assert_eq!(run("1 + 2 * 3", &bindings), Ok(Value::Integer(7)));
        assert_eq!(run("\"a\" + \"b\"", &bindings), Ok(Value::String("ab".into())));
        assert_eq!(run("!(1 < 2)", &bindings), Ok(Value::Boolean(false)));
    }

    #[test]
    fn bindings_are_read() {
        let mut bindings = Bindings::default();
        bindings.insert("age".into(), Value::Integer(17));
        assert_eq!(run("age + 1", &bindings), Ok(Value::Integer(18)));
    }

    #[test]
    fn missing_binding() {
        let error = run("age * 2", &Bindings::default()).unwrap_err();
        assert_eq!(error, ExecutionError::MissingBinding { name: "age".into() });
    }

    #[test]
    fn binding_of_wrong_type() {
        let mut bindings = Bindings::default();
        bindings.insert("age".into(), Value::String("old".into()));
        let error = run("age * 2", &bindings).unwrap_err();
        assert_eq!(
            error,
            ExecutionError::BindingTypeMismatch {
                name: "age".into(),
                expected: "int".into(),
                found: "String".into(),
            }
        );
    }

    #[test]
    fn scalar_adopts_currency_of_peer() {
        let mut bindings = Bindings::default();
        bindings.insert("premium".into(), eur("100.00"));
        assert_eq!(run("premium + 5", &bindings), Ok(eur("105.00")));
        assert_eq!(run("premium > 99.5", &bindings), Ok(Value::Boolean(true)));
    }

    #[test]
    fn short_circuit_skips_right_operand() {
        let bindings = Bindings::default();
        // `age` is unbound; reading it would fail.
        assert_eq!(run("1 > 2 && age > 1", &bindings), Ok(Value::Boolean(false)));
        assert_eq!(run("1 < 2 || age > 1", &bindings), Ok(Value::Boolean(true)));
        assert!(run("1 < 2 && age > 1", &bindings).is_err());
    }

    #[test]
    fn conditional_runs_one_branch() {
        let bindings = Bindings::default();
        assert_eq!(run("IF(1 < 2, 10, age)", &bindings), Ok(Value::Integer(10)));
    }

    #[test]
    fn failed_result_is_refused() {
        let result = compiler().compile("unknownVar * 2");
        assert_eq!(evaluate(&result, &Bindings::default()), Err(ExecutionError::NotCompiled));
    }

    #[test]
    fn runtime_faults() {
        let bindings = Bindings::default();
        assert_eq!(run("1 / 0", &bindings), Err(ExecutionError::DivisionByZero));
        assert!(matches!(
            run("9223372036854775807 + 1", &bindings),
            Err(ExecutionError::Overflow { .. })
        ));
    }
}
