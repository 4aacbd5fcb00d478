//! Expression AST nodes

use super::{Ident, TypeNode};
use crate::common::Span;

/// Expression node
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Expression kinds
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Integer literal: 42
    IntLiteral(i64),

    /// Real literal: 3.14
    RealLiteral(f64),

    /// String literal: "hello"
    StringLiteral(String),

    /// Character literal: 'a'
    CharLiteral(char),

    /// Identifier reference: foo (also true/false, which resolve to the
    /// predefined boolean enumeration constants)
    Identifier(String),

    /// Binary operation: a + b
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary operation: -x, !flag
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// Function call: foo(a, b)
    Call {
        name: Ident,
        args: Vec<Expr>,
    },

    /// Array indexing: arr[i]
    Index {
        array: Box<Expr>,
        index: Box<Expr>,
    },

    /// Record field access: p.x
    Field {
        object: Box<Expr>,
        field: Ident,
    },

    /// Array allocation: new int[n]
    NewArray {
        element: TypeNode,
        length: Box<Expr>,
    },

    /// Record construction: new Point { x = 1, y = 2 }
    NewRecord {
        name: Ident,
        fields: Vec<FieldInit>,
    },
}

/// One field initializer inside a record construction
#[derive(Debug, Clone)]
pub struct FieldInit {
    pub name: Ident,
    pub value: Expr,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod)
    }

    pub fn is_relational(self) -> bool {
        matches!(self, Self::Lt | Self::Le | Self::Gt | Self::Ge)
    }

    pub fn is_equality(self) -> bool {
        matches!(self, Self::Eq | Self::Ne)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// The operator as written in the source
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}
