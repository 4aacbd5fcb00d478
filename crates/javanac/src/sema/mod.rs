//! Semantic analysis: scope stack, symbol arena, type system and the
//! tree-walking analyzer

pub mod analyzer;
pub mod arena;
pub mod checker;
pub mod error;
pub mod predefined;
pub mod scope;
pub mod symbol;
pub mod types;
pub mod xref;

pub use analyzer::{Analyzed, SemanticAnalyzer};
pub use arena::{Arena, NameId};
pub use error::{ErrorCode, SemanticDiagnostic, SemanticErrorHandler};
pub use predefined::Predefined;
pub use scope::{CallFrame, Scope, ScopeId, ScopeStack};
pub use symbol::{ConstValue, RoutineCode, RoutineInfo, Symbol, SymbolId, SymbolKind};
pub use types::{TypeForm, TypeId, TypeInfo, Typespec};

/// The finished product of one analysis run
///
/// The program symbol's transitively reachable scopes, types and values are
/// the contract backend consumers rely on: every declared name has a
/// resolved type, every routine carries its parameter list, its own scope
/// and its body binding, and every record type carries its field scope and
/// nominal type path.
#[derive(Debug)]
pub struct Analysis {
    pub arena: Arena,
    pub predefined: Predefined,
    pub program: Option<SymbolId>,
    pub errors: SemanticErrorHandler,
}

impl Analysis {
    pub fn error_count(&self) -> usize {
        self.errors.count()
    }

    /// The program-level scope, owned by the program symbol
    pub fn program_scope(&self) -> Option<ScopeId> {
        let program = self.program?;
        self.arena.symbol(program).routine().and_then(|r| r.scope)
    }

    /// Look a name up in the program-level scope
    pub fn lookup_global(&self, name: &str) -> Option<SymbolId> {
        self.arena.lookup_in(self.program_scope()?, name)
    }

    /// The default runtime value for a datatype
    pub fn default_value(&self, type_id: TypeId) -> ConstValue {
        if type_id == self.predefined.integer_type {
            ConstValue::Integer(0)
        } else if type_id == self.predefined.real_type {
            ConstValue::Real(0.0)
        } else if type_id == self.predefined.boolean_type {
            ConstValue::Boolean(false)
        } else if type_id == self.predefined.char_type {
            ConstValue::Character('#')
        } else {
            ConstValue::Str("#".to_string())
        }
    }
}
