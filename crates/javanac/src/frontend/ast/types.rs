//! Type annotation AST nodes

use crate::common::Span;

/// A type annotation as written in the source
#[derive(Debug, Clone)]
pub struct TypeNode {
    pub kind: TypeNodeKind,
    pub span: Span,
}

impl TypeNode {
    pub fn new(kind: TypeNodeKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Type annotation kinds
#[derive(Debug, Clone)]
pub enum TypeNodeKind {
    /// Scalar keyword or a declared type name: int, bool, string, real, char, Point
    Named(String),

    /// One-dimensional array: int[], Point[]
    Array(Box<TypeNode>),
}

impl TypeNode {
    /// The annotation as it was spelled, e.g. "int[]"
    pub fn spelling(&self) -> String {
        match &self.kind {
            TypeNodeKind::Named(name) => name.clone(),
            TypeNodeKind::Array(element) => format!("{}[]", element.spelling()),
        }
    }
}
