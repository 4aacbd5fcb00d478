//! Declaration AST nodes

use super::{Block, Expr, TypeNode};
use crate::common::Span;

/// An identifier with its source location
#[derive(Debug, Clone)]
pub struct Ident {
    pub text: String,
    pub span: Span,
}

impl Ident {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }
}

/// Declaration node
#[derive(Debug, Clone)]
pub struct Decl {
    pub kind: DeclKind,
    pub span: Span,
}

impl Decl {
    pub fn new(kind: DeclKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Declaration kinds
#[derive(Debug, Clone)]
pub enum DeclKind {
    /// Constant definition: const n = 5;
    Constant(ConstantDef),

    /// Variable definition: var a, b : int; or var x = expr;
    Variable(VarDecl),

    /// Record type declaration: record Point { ... }
    Record(RecordDecl),

    /// Function definition: func f(a : int) -> int { ... }
    Function(FuncDecl),
}

/// Constant definition
#[derive(Debug, Clone)]
pub struct ConstantDef {
    pub name: Ident,
    pub init: Expr,
}

/// Variable definition
///
/// Exactly one of `ty` and `init` is present: the annotated form declares
/// one or more names against a type, the initialized form declares a single
/// name whose type is inferred from the initializer.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub names: Vec<Ident>,
    pub ty: Option<TypeNode>,
    pub init: Option<Expr>,
}

/// Record type declaration
#[derive(Debug, Clone)]
pub struct RecordDecl {
    pub name: Ident,
    pub items: Vec<RecordItem>,
}

/// One item inside a record body
#[derive(Debug, Clone)]
pub enum RecordItem {
    /// Field group: x, y : int;
    Fields(FieldDecl),

    /// Nested record type declaration
    Record(RecordDecl),
}

/// A group of fields sharing one type annotation
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub names: Vec<Ident>,
    pub ty: TypeNode,
    pub span: Span,
}

/// Function definition
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: Ident,
    pub params: Vec<Param>,
    pub return_type: Option<TypeNode>,
    pub body: Block,
}

/// One function parameter; `by_ref` marks the `var` (reference) form
#[derive(Debug, Clone)]
pub struct Param {
    pub by_ref: bool,
    pub name: Ident,
    pub ty: TypeNode,
    pub span: Span,
}
