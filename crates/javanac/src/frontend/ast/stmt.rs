//! Statement AST nodes

use super::{Decl, Expr};
use crate::common::Span;

/// A braced statement sequence
#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>, span: Span) -> Self {
        Self { stmts, span }
    }
}

/// Statement node
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Nested block: { ... }
    Block(Block),

    /// Local declaration (constant or variable)
    Decl(Decl),

    /// Assignment: target = value;
    Assign {
        target: Expr,
        value: Expr,
    },

    /// Expression statement; the grammar only produces calls here
    Call(Expr),

    /// if (cond) { ... } else ...
    If {
        condition: Expr,
        then_block: Block,
        else_branch: Option<Box<Stmt>>,
    },

    /// while (cond) { ... }
    While {
        condition: Expr,
        body: Block,
    },

    /// for (init; cond; update) { ... }
    For {
        init: Box<Stmt>,
        condition: Expr,
        update: Box<Stmt>,
        body: Block,
    },

    /// return; or return expr;
    Return(Option<Expr>),
}
