//! Semantic arena: symbols, types and scopes addressed by handles
//!
//! Scopes point back at their owning symbols, record types own field
//! scopes, and function symbols own the scope that contains their own
//! parameters. Those reference cycles are expressed as plain index handles
//! into this arena rather than owning pointers.

use super::scope::{Scope, ScopeId};
use super::symbol::{Symbol, SymbolId, SymbolKind};
use super::types::{TypeId, Typespec};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Interned identifier text
pub type NameId = DefaultSymbol;

/// Backing store for one analysis run
#[derive(Debug)]
pub struct Arena {
    symbols: Vec<Symbol>,
    types: Vec<Typespec>,
    scopes: Vec<Scope>,
    interner: DefaultStringInterner,
}

impl Arena {
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            types: Vec::new(),
            scopes: Vec::new(),
            interner: DefaultStringInterner::new(),
        }
    }

    // =========================================================================
    // Identifier interning
    // =========================================================================

    pub fn intern(&mut self, name: &str) -> NameId {
        self.interner.get_or_intern(name)
    }

    /// Interned handle for `name`, if it has been seen before
    pub fn get_name(&self, name: &str) -> Option<NameId> {
        self.interner.get(name)
    }

    pub fn name(&self, id: NameId) -> &str {
        self.interner.resolve(id).expect("name interned in this arena")
    }

    // =========================================================================
    // Allocation and access
    // =========================================================================

    pub fn add_type(&mut self, typespec: Typespec) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(typespec);
        id
    }

    pub fn typespec(&self, id: TypeId) -> &Typespec {
        &self.types[id.index()]
    }

    pub fn typespec_mut(&mut self, id: TypeId) -> &mut Typespec {
        &mut self.types[id.index()]
    }

    pub fn add_scope(&mut self, scope: Scope) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(scope);
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    // =========================================================================
    // Scope entry
    // =========================================================================

    /// Create a new symbol under `name` in `scope`
    ///
    /// Never checks for duplicates; registration sites look the name up
    /// first and flag redeclarations themselves. Variables and parameters
    /// are assigned the scope's next storage slot.
    pub fn enter(&mut self, scope: ScopeId, name: &str, kind: SymbolKind) -> SymbolId {
        let name_id = self.intern(name);
        let mut symbol = Symbol::new(name_id, kind, scope);
        if kind.takes_slot() {
            symbol.slot = Some(self.scopes[scope.index()].bump_slot());
        }

        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        self.scopes[scope.index()].insert(name_id, id);
        id
    }

    /// Look `name` up in a single scope
    pub fn lookup_in(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let name_id = self.get_name(name)?;
        self.scope(scope).get(name_id)
    }

    // =========================================================================
    // Derived data
    // =========================================================================

    /// The name chain from the program root down to `symbol`, dollar-joined
    ///
    /// Walks owner back-references: the symbol's declaring scope leads to
    /// the symbol owning that scope, and so on up to the global scope,
    /// which has no owner.
    pub fn type_path(&self, symbol: SymbolId) -> String {
        let mut names = Vec::new();
        let mut current = Some(symbol);

        while let Some(id) = current {
            let sym = self.symbol(id);
            names.push(self.name(sym.name));
            current = self.scope(sym.scope).owner();
        }

        names.reverse();
        names.join("$")
    }

    /// Human-readable description of a type, for dumps and tests
    pub fn describe_type(&self, id: TypeId) -> String {
        let typespec = self.typespec(id);
        if let Some(identifier) = typespec.identifier {
            return self.name(self.symbol(identifier).name).to_string();
        }

        match typespec.form {
            super::types::TypeForm::Array => {
                let element = typespec
                    .element_type()
                    .map_or_else(|| "?".to_string(), |e| self.describe_type(e));
                match typespec.element_count() {
                    Some(0) => format!("array of {}", element),
                    Some(count) => format!("array[{}] of {}", count, element),
                    None => format!("array of {}", element),
                }
            }
            form => format!("anonymous {}", form),
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sema::scope::Scope;

    #[test]
    fn test_interning_is_stable() {
        let mut arena = Arena::new();
        let a = arena.intern("foo");
        let b = arena.intern("foo");
        assert_eq!(a, b);
        assert_eq!(arena.name(a), "foo");
    }

    #[test]
    fn test_enter_assigns_slots_to_variables_only() {
        let mut arena = Arena::new();
        let scope = arena.add_scope(Scope::new(0));

        let constant = arena.enter(scope, "c", SymbolKind::Constant);
        let first = arena.enter(scope, "x", SymbolKind::Variable);
        let second = arena.enter(scope, "y", SymbolKind::Variable);

        assert_eq!(arena.symbol(constant).slot, None);
        assert_eq!(arena.symbol(first).slot, Some(0));
        assert_eq!(arena.symbol(second).slot, Some(1));
    }

    #[test]
    fn test_lookup_in_single_scope() {
        let mut arena = Arena::new();
        let scope = arena.add_scope(Scope::new(0));
        let entered = arena.enter(scope, "x", SymbolKind::Variable);

        assert_eq!(arena.lookup_in(scope, "x"), Some(entered));
        assert_eq!(arena.lookup_in(scope, "y"), None);
    }
}
