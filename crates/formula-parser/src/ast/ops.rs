//! Token-to-operator mapping and binding powers.
//!
//! The operators themselves live in `formula_core` because compiled code and
//! the operation registry use them too.

use formula_core::{BinaryOp, UnaryOp};

use crate::lexer::TokenKind;

/// Binding power of prefix operators; higher than all binary operators.
pub const PREFIX_BINDING_POWER: u8 = 13;

/// Get the binding power (precedence) of a binary operator.
///
/// Higher values bind more tightly. Returns (left_bp, right_bp); every
/// operator is left-associative, so right_bp = left_bp + 1.
pub fn binding_power(op: BinaryOp) -> (u8, u8) {
    use BinaryOp::*;
    match op {
        Or => (1, 2),
        And => (3, 4),
        Equal | NotEqual => (5, 6),
        Less | LessEqual | Greater | GreaterEqual => (7, 8),
        Add | Sub => (9, 10),
        Mul | Div => (11, 12),
    }
}

/// Try to convert a token kind to a binary operator.
pub fn binary_op_from_token(token: TokenKind) -> Option<BinaryOp> {
    Some(match token {
        TokenKind::PipePipe => BinaryOp::Or,
        TokenKind::AmpAmp => BinaryOp::And,
        TokenKind::Equal => BinaryOp::Equal,
        TokenKind::BangEqual => BinaryOp::NotEqual,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::LessEqual => BinaryOp::LessEqual,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        _ => return None,
    })
}

/// Try to convert a token kind to a unary prefix operator.
pub fn unary_op_from_token(token: TokenKind) -> Option<UnaryOp> {
    Some(match token {
        TokenKind::Minus => UnaryOp::Neg,
        TokenKind::Plus => UnaryOp::Plus,
        TokenKind::Bang => UnaryOp::Not,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_order() {
        let order = [
            BinaryOp::Or,
            BinaryOp::And,
            BinaryOp::Equal,
            BinaryOp::Less,
            BinaryOp::Add,
            BinaryOp::Mul,
        ];
        for pair in order.windows(2) {
            assert!(binding_power(pair[0]).0 < binding_power(pair[1]).0);
        }
        assert!(binding_power(BinaryOp::Mul).1 < PREFIX_BINDING_POWER);
    }

    #[test]
    fn all_operators_left_associative() {
        for op in BinaryOp::ALL {
            let (l, r) = binding_power(op);
            assert_eq!(r, l + 1, "{op}");
        }
    }

    #[test]
    fn token_mapping() {
        for op in BinaryOp::ALL {
            let kind = match op {
                BinaryOp::Or => TokenKind::PipePipe,
                BinaryOp::And => TokenKind::AmpAmp,
                BinaryOp::Equal => TokenKind::Equal,
                BinaryOp::NotEqual => TokenKind::BangEqual,
                BinaryOp::Less => TokenKind::Less,
                BinaryOp::LessEqual => TokenKind::LessEqual,
                BinaryOp::Greater => TokenKind::Greater,
                BinaryOp::GreaterEqual => TokenKind::GreaterEqual,
                BinaryOp::Add => TokenKind::Plus,
                BinaryOp::Sub => TokenKind::Minus,
                BinaryOp::Mul => TokenKind::Star,
                BinaryOp::Div => TokenKind::Slash,
            };
            assert_eq!(binary_op_from_token(kind), Some(op));
        }
        assert_eq!(unary_op_from_token(TokenKind::Bang), Some(UnaryOp::Not));
        assert_eq!(unary_op_from_token(TokenKind::Star), None);
    }
}
