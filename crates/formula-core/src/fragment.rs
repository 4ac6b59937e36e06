//! Compiled code.
//!
//! A [`Fragment`] is a tree of executable nodes produced by the compiler. It
//! carries no source text: operators are bound to their kernels, literals are
//! parsed values and identifiers are typed placeholders filled in by the
//! evaluator's bindings.

use std::fmt;
use std::sync::Arc;

use crate::datatype::Datatype;
use crate::error::ExecutionError;
use crate::ops::{BinaryOp, UnaryOp};
use crate::settings::NumericConfig;
use crate::value::Value;

/// Stateless implementation of a binary operation.
pub type BinaryKernel = fn(&Value, &Value, &NumericConfig) -> Result<Value, ExecutionError>;

/// Stateless implementation of a unary operation.
pub type UnaryKernel = fn(&Value, &NumericConfig) -> Result<Value, ExecutionError>;

type NativeFn = dyn Fn(&[Value], &NumericConfig) -> Result<Value, ExecutionError> + Send + Sync;

/// A function body callable from compiled code.
#[derive(Clone)]
pub struct NativeFunction {
    name: Arc<str>,
    inner: Arc<NativeFn>,
}

impl NativeFunction {
    /// Wrap `f` under the display name `name`.
    pub fn new<F>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(&[Value], &NumericConfig) -> Result<Value, ExecutionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            inner: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the function on evaluated arguments.
    pub fn call(&self, args: &[Value], numeric: &NumericConfig) -> Result<Value, ExecutionError> {
        (self.inner)(args, numeric)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NativeFunction").field(&self.name).finish()
    }
}

/// A node of compiled code.
#[derive(Debug, Clone)]
pub enum Fragment {
    /// A constant value.
    Const(Value),
    /// Placeholder for a bound identifier value.
    Identifier { name: String, datatype: Datatype },
    /// Widen the operand's value to `to`.
    Coerce { to: Datatype, operand: Box<Fragment> },
    Unary(Box<UnaryNode>),
    Binary(Box<BinaryNode>),
    /// `&&` or `||`; the right operand only runs when it decides the result.
    ShortCircuit(Box<ShortCircuitNode>),
    /// Run `then` or `otherwise` depending on `condition`.
    Conditional(Box<ConditionalNode>),
    /// Native function call on eagerly evaluated arguments.
    Call(Box<CallNode>),
    /// Code of a failed compilation; never executed.
    Invalid,
}

/// Unary operator bound to its kernel.
#[derive(Clone)]
pub struct UnaryNode {
    pub op: UnaryOp,
    pub kernel: UnaryKernel,
    pub operand: Fragment,
    /// Datatype the operand value is widened to before the kernel runs.
    pub operand_coercion: Option<Datatype>,
    pub numeric: NumericConfig,
}

/// Binary operator bound to its kernel.
///
/// Operand coercions are applied at evaluation time with the other operand
/// as peer, so a scalar widened to Money adopts the peer's currency.
#[derive(Clone)]
pub struct BinaryNode {
    pub op: BinaryOp,
    pub kernel: BinaryKernel,
    pub left: Fragment,
    pub right: Fragment,
    pub left_coercion: Option<Datatype>,
    pub right_coercion: Option<Datatype>,
    pub numeric: NumericConfig,
}

#[derive(Debug, Clone)]
pub struct ShortCircuitNode {
    pub op: BinaryOp,
    pub left: Fragment,
    pub right: Fragment,
}

#[derive(Debug, Clone)]
pub struct ConditionalNode {
    pub condition: Fragment,
    pub then: Fragment,
    pub otherwise: Fragment,
}

#[derive(Debug, Clone)]
pub struct CallNode {
    pub function: NativeFunction,
    pub args: Vec<Fragment>,
    pub numeric: NumericConfig,
}

impl fmt::Debug for UnaryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnaryNode")
            .field("op", &self.op)
            .field("operand", &self.operand)
            .field("operand_coercion", &self.operand_coercion)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for BinaryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryNode")
            .field("op", &self.op)
            .field("left", &self.left)
            .field("right", &self.right)
            .field("left_coercion", &self.left_coercion)
            .field("right_coercion", &self.right_coercion)
            .finish_non_exhaustive()
    }
}

impl Fragment {
    /// Wrap `self`, of datatype `from`, in a coercion to `to`.
    ///
    /// Values of primitive and boxed datatypes share a representation, so no
    /// node is added between them.
    pub fn coerced(self, from: &Datatype, to: &Datatype) -> Fragment {
        if from == to || from.boxed() == to.boxed() {
            self
        } else {
            Fragment::Coerce {
                to: to.clone(),
                operand: Box::new(self),
            }
        }
    }

    /// Whether this is the code of a failed compilation.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Fragment::Invalid)
    }

    /// The constant value, if this fragment is a constant.
    pub fn as_const(&self) -> Option<&Value> {
        match self {
            Fragment::Const(value) => Some(value),
            _ => None,
        }
    }

    /// Call `f` for every identifier placeholder, in evaluation order.
    pub fn for_each_identifier<'a>(&'a self, f: &mut impl FnMut(&'a str, &'a Datatype)) {
        match self {
            Fragment::Const(_) | Fragment::Invalid => {}
            Fragment::Identifier { name, datatype } => f(name, datatype),
            Fragment::Coerce { operand, .. } => operand.for_each_identifier(f),
            Fragment::Unary(node) => node.operand.for_each_identifier(f),
            Fragment::Binary(node) => {
                node.left.for_each_identifier(f);
                node.right.for_each_identifier(f);
            }
            Fragment::ShortCircuit(node) => {
                node.left.for_each_identifier(f);
                node.right.for_each_identifier(f);
            }
            Fragment::Conditional(node) => {
                node.condition.for_each_identifier(f);
                node.then.for_each_identifier(f);
                node.otherwise.for_each_identifier(f);
            }
            Fragment::Call(node) => {
                for arg in &node.args {
                    arg.for_each_identifier(f);
                }
            }
        }
    }
}
