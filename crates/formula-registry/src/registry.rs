//! OperationRegistry - operator lookup with implicit coercions.
//!
//! This module provides [`OperationRegistry`], the table of binary and unary
//! operations the compiler binds operators to.
//!
//! # Storage Model
//!
//! Operations live in registration order in a `Vec`; an `FxHashMap` keyed by
//! `(operator, operand datatypes)` indexes into it. The position of an
//! operation doubles as its priority when resolution finds several
//! candidates at the same distance.
//!
//! # Resolution
//!
//! 1. An operation registered for exactly the operand datatypes.
//! 2. Otherwise every combination of the operands' widenings is tried. The
//!    candidate with the smallest total coercion distance wins; among equal
//!    distances the earliest registered one. A scalar may only widen to
//!    Money when the other operand is Money, since it adopts that operand's
//!    currency.
//! 3. Otherwise a `NO_OPERATION` message naming the operator and the
//!    original datatypes.
//!
//! # Example
//!
//! ```
//! use formula_core::{BinaryOp, Datatype};
//! use formula_registry::OperationRegistry;
//!
//! let registry = OperationRegistry::with_builtins();
//!
//! // There is no Integer division; both operands widen to Decimal.
//! let found = registry
//!     .resolve_binary(BinaryOp::Div, &Datatype::Integer, &Datatype::Integer)
//!     .unwrap();
//! assert_eq!(found.operation.result, Datatype::Decimal);
//! assert_eq!(found.distance, 2);
//! ```

use rustc_hash::FxHashMap;
use tracing::trace;

use formula_core::{BinaryOp, Datatype, EnumType, Message, MessageCode, UnaryOp};

use crate::builtins;
use crate::error::RegistrationError;
use crate::operation::{BinaryOperation, UnaryOperation};

/// A binary operation chosen for a pair of operand datatypes.
#[derive(Debug, Clone, Copy)]
pub struct BinaryMatch<'r> {
    pub operation: &'r BinaryOperation,
    /// Total number of coercion steps applied to the operands.
    pub distance: u32,
}

/// A unary operation chosen for an operand datatype.
#[derive(Debug, Clone, Copy)]
pub struct UnaryMatch<'r> {
    pub operation: &'r UnaryOperation,
    pub distance: u32,
}

/// Registry of operations and enum types.
#[derive(Debug, Default)]
pub struct OperationRegistry {
    /// Binary operations in registration order.
    binary: Vec<BinaryOperation>,
    binary_index: FxHashMap<(BinaryOp, Datatype, Datatype), usize>,

    /// Unary operations in registration order.
    unary: Vec<UnaryOperation>,
    unary_index: FxHashMap<(UnaryOp, Datatype), usize>,

    /// Registered enum types by id.
    enums: FxHashMap<String, EnumType>,
}

impl OperationRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in operation table.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register(&mut registry);
        registry
    }

    // =========================================
    // Registration
    // =========================================

    /// Register a binary operation.
    ///
    /// Fails if an operation with the same operator and operand datatypes
    /// already exists.
    pub fn register_binary(&mut self, operation: BinaryOperation) -> Result<(), RegistrationError> {
        let key = (operation.op, operation.left.clone(), operation.right.clone());
        if self.binary_index.contains_key(&key) {
            return Err(RegistrationError::DuplicateOperation(operation.to_string()));
        }
        self.push_binary(operation);
        Ok(())
    }

    /// Register a unary operation.
    pub fn register_unary(&mut self, operation: UnaryOperation) -> Result<(), RegistrationError> {
        let key = (operation.op, operation.operand.clone());
        if self.unary_index.contains_key(&key) {
            return Err(RegistrationError::DuplicateOperation(operation.to_string()));
        }
        self.push_unary(operation);
        Ok(())
    }

    /// Register an enum type together with its `=` and `!=` operations.
    pub fn register_enum_type(&mut self, enum_type: EnumType) -> Result<(), RegistrationError> {
        let id = enum_type.id();
        if Datatype::BUILTIN.iter().any(|d| d.name() == id) {
            return Err(RegistrationError::ReservedName(id.to_string()));
        }
        if self.enums.contains_key(id) {
            return Err(RegistrationError::DuplicateEnumType(id.to_string()));
        }

        for operation in builtins::enum_equality(&enum_type.datatype()) {
            self.register_binary(operation)?;
        }
        trace!(enum_type = id, members = enum_type.members().len(), "registered enum type");
        self.enums.insert(id.to_string(), enum_type);
        Ok(())
    }

    pub(crate) fn push_binary(&mut self, operation: BinaryOperation) {
        let key = (operation.op, operation.left.clone(), operation.right.clone());
        self.binary_index.insert(key, self.binary.len());
        self.binary.push(operation);
    }

    pub(crate) fn push_unary(&mut self, operation: UnaryOperation) {
        let key = (operation.op, operation.operand.clone());
        self.unary_index.insert(key, self.unary.len());
        self.unary.push(operation);
    }

    // =========================================
    // Lookup
    // =========================================

    /// The operation registered for exactly these operand datatypes.
    pub fn get_binary(
        &self,
        op: BinaryOp,
        left: &Datatype,
        right: &Datatype,
    ) -> Option<&BinaryOperation> {
        self.binary_index
            .get(&(op, left.clone(), right.clone()))
            .map(|&index| &self.binary[index])
    }

    /// The operation registered for exactly this operand datatype.
    pub fn get_unary(&self, op: UnaryOp, operand: &Datatype) -> Option<&UnaryOperation> {
        self.unary_index
            .get(&(op, operand.clone()))
            .map(|&index| &self.unary[index])
    }

    /// All binary operations in registration order.
    pub fn binary_operations(&self) -> impl Iterator<Item = &BinaryOperation> {
        self.binary.iter()
    }

    /// All unary operations in registration order.
    pub fn unary_operations(&self) -> impl Iterator<Item = &UnaryOperation> {
        self.unary.iter()
    }

    /// A registered enum type by id.
    pub fn enum_type(&self, id: &str) -> Option<&EnumType> {
        self.enums.get(id)
    }

    /// All registered enum types.
    pub fn enum_types(&self) -> impl Iterator<Item = &EnumType> {
        self.enums.values()
    }

    // =========================================
    // Resolution
    // =========================================

    /// Find the operation to apply for `left op right`.
    pub fn resolve_binary(
        &self,
        op: BinaryOp,
        left: &Datatype,
        right: &Datatype,
    ) -> Result<BinaryMatch<'_>, Message> {
        if let Some(operation) = self.get_binary(op, left, right) {
            trace!(%op, %left, %right, %operation, "exact binary operation");
            return Ok(BinaryMatch {
                operation,
                distance: 0,
            });
        }

        let right_widenings = right.widenings();
        let mut best: Option<(u32, usize)> = None;
        for (left_target, left_distance) in left.widenings() {
            if left.coercion_needs_currency(&left_target) && *right != Datatype::Money {
                continue;
            }
            for (right_target, right_distance) in &right_widenings {
                if right.coercion_needs_currency(right_target) && *left != Datatype::Money {
                    continue;
                }
                let key = (op, left_target.clone(), right_target.clone());
                if let Some(&index) = self.binary_index.get(&key) {
                    let candidate = (left_distance + right_distance, index);
                    if best.is_none_or(|b| candidate < b) {
                        best = Some(candidate);
                    }
                }
            }
        }

        match best {
            Some((distance, index)) => {
                let operation = &self.binary[index];
                trace!(%op, %left, %right, %operation, distance, "widened binary operation");
                Ok(BinaryMatch {
                    operation,
                    distance,
                })
            }
            None => {
                trace!(%op, %left, %right, "no binary operation");
                Err(Message::error(
                    MessageCode::NoOperation,
                    format!("the operator '{op}' is not defined for {left} and {right}"),
                ))
            }
        }
    }

    /// Find the operation to apply for `op operand`.
    pub fn resolve_unary(
        &self,
        op: UnaryOp,
        operand: &Datatype,
    ) -> Result<UnaryMatch<'_>, Message> {
        let found = operand
            .widenings()
            .into_iter()
            .filter(|(target, _)| !operand.coercion_needs_currency(target))
            .find_map(|(target, distance)| {
                self.get_unary(op, &target).map(|operation| UnaryMatch {
                    operation,
                    distance,
                })
            });

        match found {
            Some(found) => {
                trace!(
                    %op,
                    %operand,
                    operation = %found.operation,
                    distance = found.distance,
                    "unary operation"
                );
                Ok(found)
            }
            None => {
                trace!(%op, %operand, "no unary operation");
                Err(Message::error(
                    MessageCode::NoOperation,
                    format!("the operator '{op}' is not defined for {operand}"),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formula_core::{ExecutionError, NumericConfig, Value};
    use pretty_assertions::assert_eq;

    fn resolve(
        registry: &OperationRegistry,
        op: BinaryOp,
        left: Datatype,
        right: Datatype,
    ) -> (Datatype, Datatype, Datatype, u32) {
        let found = registry.resolve_binary(op, &left, &right).unwrap();
        (
            found.operation.left.clone(),
            found.operation.right.clone(),
            found.operation.result.clone(),
            found.distance,
        )
    }

    #[test]
    fn builtin_keys_are_unique() {
        let registry = OperationRegistry::with_builtins();
        assert_eq!(registry.binary.len(), registry.binary_index.len());
        assert_eq!(registry.unary.len(), registry.unary_index.len());
    }

    #[test]
    fn exact_match_wins() {
        let registry = OperationRegistry::with_builtins();
        use Datatype::*;
        assert_eq!(
            resolve(&registry, BinaryOp::Add, Integer, Integer),
            (Integer, Integer, Integer, 0)
        );
        assert_eq!(
            resolve(&registry, BinaryOp::Div, Money, Money),
            (Money, Money, Decimal, 0)
        );
    }

    #[test]
    fn integer_division_widens_to_decimal() {
        let registry = OperationRegistry::with_builtins();
        use Datatype::*;
        assert_eq!(
            resolve(&registry, BinaryOp::Div, Integer, Integer),
            (Decimal, Decimal, Decimal, 2)
        );
    }

    #[test]
    fn mixed_numeric_operands() {
        let registry = OperationRegistry::with_builtins();
        use Datatype::*;
        assert_eq!(
            resolve(&registry, BinaryOp::Add, Integer, Decimal),
            (Decimal, Decimal, Decimal, 1)
        );
        assert_eq!(
            resolve(&registry, BinaryOp::Mul, Money, Integer),
            (Money, Decimal, Money, 1)
        );
        assert_eq!(
            resolve(&registry, BinaryOp::Add, Decimal, Money),
            (Money, Money, Money, 1)
        );
        assert_eq!(
            resolve(&registry, BinaryOp::Less, PrimitiveInteger, Integer),
            (Integer, Integer, Boolean, 1)
        );
    }

    #[test]
    fn money_compares_with_unrounded_scalars() {
        let registry = OperationRegistry::with_builtins();
        use Datatype::*;
        assert_eq!(
            resolve(&registry, BinaryOp::Less, Money, Decimal),
            (Money, Decimal, Boolean, 0)
        );
        assert_eq!(
            resolve(&registry, BinaryOp::Less, Money, Integer),
            (Money, Decimal, Boolean, 1)
        );
        assert_eq!(
            resolve(&registry, BinaryOp::Equal, PrimitiveInteger, Money),
            (Decimal, Money, Boolean, 2)
        );
        assert_eq!(resolve(&registry, BinaryOp::Equal, Money, Money), (Money, Money, Boolean, 0));
    }

    fn always_true(_: &Value, _: &Value, _: &NumericConfig) -> Result<Value, ExecutionError> {
        Ok(Value::Boolean(true))
    }

    #[test]
    fn scalars_do_not_become_money_on_their_own() {
        let mut registry = OperationRegistry::new();
        registry
            .register_binary(BinaryOperation::new(
                BinaryOp::Equal,
                Datatype::Money,
                Datatype::Decimal,
                Datatype::Boolean,
                always_true,
            ))
            .unwrap();

        let money_left =
            registry.resolve_binary(BinaryOp::Equal, &Datatype::Money, &Datatype::Integer);
        assert_eq!(money_left.map(|m| m.distance).ok(), Some(1));

        // Reaching (Money, Decimal) would need a currency for the Integer.
        let scalars =
            registry.resolve_binary(BinaryOp::Equal, &Datatype::Integer, &Datatype::Decimal);
        assert!(scalars.is_err());
    }

    #[test]
    fn earliest_registration_breaks_ties() {
        let mut registry = OperationRegistry::new();
        for (left, right) in [
            (Datatype::Integer, Datatype::Decimal),
            (Datatype::Decimal, Datatype::Integer),
        ] {
            registry
                .register_binary(BinaryOperation::new(
                    BinaryOp::Add,
                    left,
                    right,
                    Datatype::Boolean,
                    always_true,
                ))
                .unwrap();
        }

        let found = registry
            .resolve_binary(BinaryOp::Add, &Datatype::Integer, &Datatype::Integer)
            .unwrap();
        assert_eq!(found.distance, 1);
        assert_eq!(found.operation.left, Datatype::Integer);
        assert_eq!(found.operation.right, Datatype::Decimal);
    }

    #[test]
    fn no_operation_names_original_types() {
        let registry = OperationRegistry::with_builtins();
        let message = registry
            .resolve_binary(BinaryOp::Sub, &Datatype::String, &Datatype::Integer)
            .unwrap_err();
        assert_eq!(message.code(), MessageCode::NoOperation);
        assert_eq!(message.text(), "the operator '-' is not defined for String and Integer");

        let message = registry
            .resolve_unary(UnaryOp::Not, &Datatype::Integer)
            .unwrap_err();
        assert_eq!(message.text(), "the operator '!' is not defined for Integer");
    }

    #[test]
    fn unary_widens_primitives() {
        let registry = OperationRegistry::with_builtins();
        let found = registry
            .resolve_unary(UnaryOp::Neg, &Datatype::PrimitiveInteger)
            .unwrap();
        assert_eq!(found.operation.operand, Datatype::Integer);
        assert_eq!(found.distance, 1);
        let found = registry
            .resolve_unary(UnaryOp::Not, &Datatype::PrimitiveBoolean)
            .unwrap();
        assert_eq!(found.operation.result, Datatype::Boolean);
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = OperationRegistry::with_builtins();
        let operation = registry
            .get_binary(BinaryOp::Add, &Datatype::Integer, &Datatype::Integer)
            .cloned()
            .unwrap();
        assert_eq!(
            registry.register_binary(operation),
            Err(RegistrationError::DuplicateOperation(
                "Integer + Integer -> Integer".into()
            ))
        );
    }

    #[test]
    fn enum_types_get_equality() {
        let mut registry = OperationRegistry::with_builtins();
        let gender = EnumType::new("Gender", ["MALE", "FEMALE"]);
        registry.register_enum_type(gender.clone()).unwrap();

        let datatype = gender.datatype();
        let found = registry
            .resolve_binary(BinaryOp::Equal, &datatype, &datatype)
            .unwrap();
        assert_eq!(found.operation.result, Datatype::Boolean);
        assert!(registry.resolve_binary(BinaryOp::Less, &datatype, &datatype).is_err());
        assert_eq!(registry.enum_type("Gender"), Some(&gender));

        assert_eq!(
            registry.register_enum_type(gender),
            Err(RegistrationError::DuplicateEnumType("Gender".into()))
        );
        assert_eq!(
            registry.register_enum_type(EnumType::new("Money", ["A"])),
            Err(RegistrationError::ReservedName("Money".into()))
        );
    }
}
