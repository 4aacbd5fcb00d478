//! Lexical scopes and the scope stack

use super::arena::{Arena, NameId};
use super::symbol::{SymbolId, SymbolKind};
use std::collections::HashMap;

/// Handle to a [`Scope`] in the semantic arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub(crate) u32);

impl ScopeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// One lexical level: an insertion-ordered name-to-symbol mapping with an
/// owner back-reference and a storage slot counter
#[derive(Debug)]
pub struct Scope {
    level: usize,
    owner: Option<SymbolId>,
    entries: HashMap<NameId, SymbolId>,
    order: Vec<SymbolId>,
    next_slot: usize,
}

impl Scope {
    pub fn new(level: usize) -> Self {
        Self {
            level,
            owner: None,
            entries: HashMap::new(),
            order: Vec::new(),
            next_slot: 0,
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// The symbol this scope belongs to: a function, a record type or the
    /// program; the global scope has no owner
    pub fn owner(&self) -> Option<SymbolId> {
        self.owner
    }

    pub fn set_owner(&mut self, owner: SymbolId) {
        self.owner = Some(owner);
    }

    /// Insert an entry; duplicate checking is the caller's responsibility
    pub(crate) fn insert(&mut self, name: NameId, symbol: SymbolId) {
        self.entries.insert(name, symbol);
        self.order.push(symbol);
    }

    pub fn get(&self, name: NameId) -> Option<SymbolId> {
        self.entries.get(&name).copied()
    }

    /// Entries in declaration order
    pub fn symbols(&self) -> &[SymbolId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn bump_slot(&mut self) -> usize {
        let slot = self.next_slot;
        self.next_slot += 1;
        slot
    }
}

/// Saved caller levels for a call-frame redirection; see
/// [`ScopeStack::begin_call_frame`]
#[derive(Debug)]
pub struct CallFrame {
    saved: Vec<ScopeId>,
}

/// The ordered chain of currently active scopes; top = innermost
///
/// The global scope (level 0) and the program scope (level 1) are
/// foundational: once pushed they are never removed while the stack exists.
#[derive(Debug)]
pub struct ScopeStack {
    stack: Vec<ScopeId>,
    /// How many bottom levels are permanent (1 until the program scope is
    /// in place, 2 afterwards)
    permanent: usize,
    program_id: Option<SymbolId>,
}

impl ScopeStack {
    /// Create a stack with a fresh global scope at level 0
    pub fn new(arena: &mut Arena) -> Self {
        let global = arena.add_scope(Scope::new(0));
        Self {
            stack: vec![global],
            permanent: 1,
            program_id: None,
        }
    }

    /// Current nesting level: index of the top scope
    pub fn current_nesting_level(&self) -> usize {
        self.stack.len() - 1
    }

    pub fn top(&self) -> ScopeId {
        *self.stack.last().expect("global scope is never popped")
    }

    pub fn global(&self) -> ScopeId {
        self.stack[0]
    }

    pub fn program_id(&self) -> Option<SymbolId> {
        self.program_id
    }

    /// Record the program symbol and pin the program scope as permanent
    pub fn set_program_id(&mut self, program: SymbolId) {
        self.program_id = Some(program);
        self.permanent = self.stack.len().min(2);
    }

    /// Push a new empty scope on top and return it
    pub fn push(&mut self, arena: &mut Arena) -> ScopeId {
        let scope = arena.add_scope(Scope::new(self.stack.len()));
        self.stack.push(scope);
        scope
    }

    /// Re-enter an existing scope (a routine's own scope at call time)
    pub fn push_existing(&mut self, scope: ScopeId) {
        self.stack.push(scope);
    }

    /// Remove and return the top scope
    ///
    /// Popping a permanent level is a caller bug, not a recoverable
    /// condition, and panics.
    pub fn pop(&mut self) -> ScopeId {
        assert!(
            self.stack.len() > self.permanent,
            "scope stack underflow: attempted to pop a permanent level"
        );
        self.stack.pop().expect("stack is non-empty")
    }

    /// Create a new symbol in the top scope; never checks for duplicates
    /// (callers look the name up first and flag redeclarations)
    pub fn enter_local(&mut self, arena: &mut Arena, name: &str, kind: SymbolKind) -> SymbolId {
        arena.enter(self.top(), name, kind)
    }

    /// Look `name` up in the top scope only
    pub fn lookup_local(&self, arena: &Arena, name: &str) -> Option<SymbolId> {
        arena.lookup_in(self.top(), name)
    }

    /// Look `name` up from the innermost scope outward; the first match
    /// wins, which realizes lexical shadowing
    pub fn lookup(&self, arena: &Arena, name: &str) -> Option<SymbolId> {
        let name_id = arena.get_name(name)?;
        self.stack
            .iter()
            .rev()
            .find_map(|&scope| arena.scope(scope).get(name_id))
    }

    /// Redirect the stack for a call: every level above the two permanent
    /// ones is saved and replaced by the callee's own scope, so the callee
    /// body sees global and program declarations but not the caller's
    /// locals. [`ScopeStack::end_call_frame`] restores the caller's chain.
    pub fn begin_call_frame(&mut self, callee_scope: ScopeId) -> CallFrame {
        let saved = self.stack.split_off(self.permanent);
        self.stack.push(callee_scope);
        CallFrame { saved }
    }

    /// Undo a call-frame redirection
    pub fn end_call_frame(&mut self, frame: CallFrame) {
        self.stack.truncate(self.permanent);
        self.stack.extend(frame.saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sema::symbol::SymbolKind;

    fn fresh() -> (Arena, ScopeStack) {
        let mut arena = Arena::new();
        let stack = ScopeStack::new(&mut arena);
        (arena, stack)
    }

    #[test]
    fn test_lookup_finds_innermost_shadowing_declaration() {
        let (mut arena, mut stack) = fresh();

        let outer = stack.enter_local(&mut arena, "x", SymbolKind::Variable);
        stack.push(&mut arena);
        let inner = stack.enter_local(&mut arena, "x", SymbolKind::Variable);

        assert_eq!(stack.lookup(&arena, "x"), Some(inner));

        stack.pop();
        assert_eq!(stack.lookup(&arena, "x"), Some(outer));
    }

    #[test]
    fn test_lookup_local_ignores_outer_scopes() {
        let (mut arena, mut stack) = fresh();

        stack.enter_local(&mut arena, "x", SymbolKind::Variable);
        stack.push(&mut arena);

        assert_eq!(stack.lookup_local(&arena, "x"), None);
        assert!(stack.lookup(&arena, "x").is_some());
    }

    #[test]
    fn test_nesting_level_tracks_pushes() {
        let (mut arena, mut stack) = fresh();
        assert_eq!(stack.current_nesting_level(), 0);

        stack.push(&mut arena);
        assert_eq!(stack.current_nesting_level(), 1);

        stack.pop();
        assert_eq!(stack.current_nesting_level(), 0);
    }

    #[test]
    #[should_panic(expected = "permanent level")]
    fn test_popping_the_global_scope_panics() {
        let (_, mut stack) = fresh();
        stack.pop();
    }

    #[test]
    fn test_call_frame_hides_caller_locals() {
        let (mut arena, mut stack) = fresh();

        // Program level with one declaration.
        let program_scope = stack.push(&mut arena);
        let program = arena.enter(program_scope, "p", SymbolKind::Program);
        stack.set_program_id(program);
        stack.enter_local(&mut arena, "g", SymbolKind::Variable);

        // Caller block with a local.
        stack.push(&mut arena);
        stack.enter_local(&mut arena, "local", SymbolKind::Variable);

        // Callee scope with a parameter.
        let callee_scope = arena.add_scope(Scope::new(2));
        let param = arena.enter(callee_scope, "a", SymbolKind::ValueParameter);

        let frame = stack.begin_call_frame(callee_scope);
        assert_eq!(stack.lookup(&arena, "local"), None);
        assert!(stack.lookup(&arena, "g").is_some());
        assert_eq!(stack.lookup(&arena, "a"), Some(param));

        stack.end_call_frame(frame);
        assert!(stack.lookup(&arena, "local").is_some());
        assert_eq!(stack.lookup(&arena, "a"), None);
    }
}
