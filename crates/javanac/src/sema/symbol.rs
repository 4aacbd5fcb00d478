//! Symbol table entries

use super::arena::NameId;
use super::scope::ScopeId;
use super::types::TypeId;
use std::fmt;

/// Handle to a [`Symbol`] in the semantic arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub(crate) u32);

impl SymbolId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a declared name stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Program,
    ProgramParameter,
    Constant,
    Type,
    Variable,
    ValueParameter,
    ReferenceParameter,
    RecordField,
    Function,
    EnumerationConstant,
}

impl SymbolKind {
    /// Variables and parameters receive a storage slot in their scope
    pub fn takes_slot(self) -> bool {
        matches!(
            self,
            Self::Variable | Self::ValueParameter | Self::ReferenceParameter
        )
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Program => "program",
            Self::ProgramParameter => "program parameter",
            Self::Constant => "constant",
            Self::Type => "type",
            Self::Variable => "variable",
            Self::ValueParameter => "value parameter",
            Self::ReferenceParameter => "reference parameter",
            Self::RecordField => "record field",
            Self::Function => "function",
            Self::EnumerationConstant => "enumeration constant",
        };
        write!(f, "{}", text)
    }
}

/// A compile-time value
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Character(char),
    Str(String),
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{}", v),
            Self::Real(v) => write!(f, "{}", v),
            Self::Boolean(v) => write!(f, "{}", v),
            Self::Character(c) => write!(f, "'{}'", c),
            Self::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Discriminates built-in routines from user-declared ones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineCode {
    Print,
    Println,
    Read,
    Readln,
    Declared,
}

impl RoutineCode {
    pub fn is_builtin(self) -> bool {
        self != Self::Declared
    }
}

/// Routine-specific data carried by `Function` symbols
#[derive(Debug, Clone)]
pub struct RoutineInfo {
    pub code: RoutineCode,
    /// Parameter symbols in declaration order; empty for built-ins, whose
    /// arity is checked structurally at each call site
    pub params: Vec<SymbolId>,
    /// The routine's own parameter+local scope, re-entered at call time
    pub scope: Option<ScopeId>,
    pub return_type: Option<TypeId>,
    /// Index of the unexecuted body in the analyzer's body registry,
    /// bound after the prototype completes
    pub body: Option<usize>,
    /// Set once the body has been analyzed; recursion re-entry stops here
    pub body_checked: bool,
}

impl RoutineInfo {
    pub fn builtin(code: RoutineCode, return_type: Option<TypeId>) -> Self {
        Self {
            code,
            params: Vec::new(),
            scope: None,
            return_type,
            body: None,
            body_checked: true,
        }
    }

    pub fn declared(return_type: Option<TypeId>) -> Self {
        Self {
            code: RoutineCode::Declared,
            params: Vec::new(),
            scope: None,
            return_type,
            body: None,
            body_checked: false,
        }
    }
}

/// One declared name: kind, type, value and cross-reference lines
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: NameId,
    pub kind: SymbolKind,
    /// Scope this symbol was declared in; owner back-references start here
    pub scope: ScopeId,
    pub type_id: Option<TypeId>,
    /// Compile-time value for constants; doubles as a cache of the last
    /// evaluated value for variables
    pub value: Option<ConstValue>,
    /// Source lines that declare or reference this symbol, in order
    pub declared_lines: Vec<usize>,
    /// Storage slot within the declaring scope (variables and parameters)
    pub slot: Option<usize>,
    pub routine: Option<RoutineInfo>,
}

impl Symbol {
    pub fn new(name: NameId, kind: SymbolKind, scope: ScopeId) -> Self {
        Self {
            name,
            kind,
            scope,
            type_id: None,
            value: None,
            declared_lines: Vec::new(),
            slot: None,
            routine: None,
        }
    }

    /// Record a source line that references this symbol
    pub fn append_line(&mut self, line: usize) {
        if self.declared_lines.last() != Some(&line) {
            self.declared_lines.push(line);
        }
    }

    pub fn routine(&self) -> Option<&RoutineInfo> {
        self.routine.as_ref()
    }

    pub fn routine_mut(&mut self) -> Option<&mut RoutineInfo> {
        self.routine.as_mut()
    }
}
