//! The standard function library.
//!
//! | Function | Arguments | Result |
//! |---|---|---|
//! | `ABS(x)` | Integer, Decimal or Money | datatype of `x` |
//! | `MIN(a; b)`, `MAX(a; b)` | numbers of a common datatype | the common datatype |
//! | `ROUND(x; n)`, `ROUNDUP(x; n)`, `ROUNDDOWN(x; n)` | Decimal or Money, Integer | datatype of `x` |
//! | `WHOLENUMBER(x)` | Decimal | Integer, truncated |
//! | `IF(c; a; b)` | Boolean, two values of a common datatype | the common datatype |
//! | `NOT(b)` | Boolean | Boolean |
//! | `AND(b; ...)`, `OR(b; ...)` | one or more Booleans | Boolean, short-circuit |
//!
//! Names are case-insensitive. The argument separator depends on the locale.

mod logical;
mod numeric;

use tracing::trace;

use formula_core::{
    CallNode, CompilationResult, Datatype, Fragment, Message, MessageCode, NativeFunction,
};

use crate::resolve::{FunctionResolver, ResolveContext, argument_types};

/// Resolver for the built-in functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFunctions;

impl StandardFunctions {
    /// Names of all standard functions.
    pub const NAMES: [&'static str; 11] = [
        "ABS",
        "IF",
        "MIN",
        "MAX",
        "ROUND",
        "ROUNDUP",
        "ROUNDDOWN",
        "WHOLENUMBER",
        "NOT",
        "AND",
        "OR",
    ];
}

impl FunctionResolver for StandardFunctions {
    fn try_resolve(
        &self,
        name: &str,
        args: &[CompilationResult],
        context: &ResolveContext,
    ) -> Option<CompilationResult> {
        let upper = name.to_ascii_uppercase();
        let call = Call {
            name: &upper,
            args,
            context,
        };

        let result = match upper.as_str() {
            "ABS" => numeric::abs(&call),
            "MIN" => numeric::min_max(&call, false),
            "MAX" => numeric::min_max(&call, true),
            "ROUND" | "ROUNDUP" | "ROUNDDOWN" => numeric::round(&call),
            "WHOLENUMBER" => numeric::whole_number(&call),
            "IF" => logical::if_then_else(&call),
            "NOT" => logical::not(&call),
            "AND" | "OR" => logical::and_or(&call),
            _ => return None,
        };
        trace!(function = %upper, succeeded = result.succeeded(), "standard function");
        Some(result)
    }
}

/// A call being resolved, with helpers for argument checks.
struct Call<'a> {
    /// Upper-cased function name.
    name: &'a str,
    args: &'a [CompilationResult],
    context: &'a ResolveContext,
}

impl Call<'_> {
    /// Argument datatypes with primitives boxed.
    fn types(&self) -> Vec<Datatype> {
        argument_types(self.args).iter().map(Datatype::boxed).collect()
    }

    fn check_count(&self, expected: usize) -> Result<(), CompilationResult> {
        if self.args.len() == expected {
            Ok(())
        } else {
            let plural = if expected == 1 { "" } else { "s" };
            Err(self.fail(
                MessageCode::WrongArgumentCount,
                format!(
                    "{} expects {expected} argument{plural}, got {}",
                    self.name,
                    self.args.len()
                ),
            ))
        }
    }

    fn wrong_types(&self) -> CompilationResult {
        let types: Vec<String> = argument_types(self.args)
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        self.fail(
            MessageCode::WrongArgumentTypes,
            format!("{} cannot be applied to ({})", self.name, types.join(", ")),
        )
    }

    fn fail(&self, code: MessageCode, text: String) -> CompilationResult {
        CompilationResult::failed(Message::error(code, text).with_span(self.context.span))
    }

    /// Argument `index` widened to `to`.
    fn arg_as(&self, index: usize, to: &Datatype) -> Fragment {
        let arg = &self.args[index];
        match arg.datatype() {
            Some(from) => arg.fragment().clone().coerced(from, to),
            None => Fragment::Invalid,
        }
    }

    /// A call of `function` on the arguments widened to `param_types`.
    fn native(
        &self,
        function: NativeFunction,
        param_types: &[Datatype],
        result: Datatype,
    ) -> CompilationResult {
        let args = param_types
            .iter()
            .enumerate()
            .map(|(i, to)| self.arg_as(i, to))
            .collect();
        let node = CallNode {
            function,
            args,
            numeric: self.context.numeric,
        };
        CompilationResult::new(Fragment::Call(Box::new(node)), result)
    }
}

/// The common datatype of two values, unless reaching it needs a currency.
fn common_datatype(a: &Datatype, b: &Datatype) -> Option<Datatype> {
    let common = a.common_supertype(b)?;
    (!a.coercion_needs_currency(&common) && !b.coercion_needs_currency(&common)).then_some(common)
}
