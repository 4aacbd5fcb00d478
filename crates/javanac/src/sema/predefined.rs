//! Predefined environment: built-in types, constants and routines
//!
//! Constructed once per analysis run against a freshly created scope stack
//! and threaded through every component by reference. Seeding an already
//! populated stack goes through the normal declaration path and would
//! surface as redeclarations, which is why a run never seeds twice.

use super::arena::Arena;
use super::scope::ScopeStack;
use super::symbol::{ConstValue, RoutineCode, RoutineInfo, SymbolId, SymbolKind};
use super::types::{TypeId, TypeInfo, Typespec};

/// Handles to the predefined types and identifiers
#[derive(Debug, Clone)]
pub struct Predefined {
    // Types
    pub integer_type: TypeId,
    pub real_type: TypeId,
    pub boolean_type: TypeId,
    pub char_type: TypeId,
    pub string_type: TypeId,
    /// Placeholder type for unresolved declarations; never entered in any
    /// scope
    pub undefined_type: TypeId,

    // Identifiers
    pub integer_id: SymbolId,
    pub real_id: SymbolId,
    pub boolean_id: SymbolId,
    pub char_id: SymbolId,
    pub string_id: SymbolId,
    pub false_id: SymbolId,
    pub true_id: SymbolId,
    pub print_id: SymbolId,
    pub println_id: SymbolId,
    pub read_id: SymbolId,
    pub readln_id: SymbolId,
}

/// Enter one predefined type name and wire identifier and type together
fn enter_type(
    arena: &mut Arena,
    stack: &mut ScopeStack,
    name: &str,
    typespec: Typespec,
) -> (TypeId, SymbolId) {
    let id = stack.enter_local(arena, name, SymbolKind::Type);
    let type_id = arena.add_type(typespec);
    arena.typespec_mut(type_id).identifier = Some(id);
    arena.symbol_mut(id).type_id = Some(type_id);
    (type_id, id)
}

/// Enter one standard routine
///
/// Standard routines carry no parameter list and no scope of their own;
/// argument arity is checked structurally at each call site.
fn enter_standard(
    arena: &mut Arena,
    stack: &mut ScopeStack,
    name: &str,
    code: RoutineCode,
    return_type: Option<TypeId>,
) -> SymbolId {
    let id = stack.enter_local(arena, name, SymbolKind::Function);
    arena.symbol_mut(id).routine = Some(RoutineInfo::builtin(code, return_type));
    id
}

impl Predefined {
    /// Seed a fresh scope stack with the predefined identifiers
    pub fn initialize(arena: &mut Arena, stack: &mut ScopeStack) -> Self {
        // Types.
        let (integer_type, integer_id) = enter_type(arena, stack, "integer", Typespec::scalar());
        let (real_type, real_id) = enter_type(arena, stack, "real", Typespec::scalar());
        let (boolean_type, boolean_id) =
            enter_type(arena, stack, "boolean", Typespec::enumeration());
        let (char_type, char_id) = enter_type(arena, stack, "char", Typespec::scalar());
        let (string_type, string_id) = enter_type(arena, stack, "string", Typespec::scalar());

        // The undefined type has a form but no name.
        let undefined_type = arena.add_type(Typespec::scalar());

        // Boolean enumeration constants, in ordinal order.
        let false_id = stack.enter_local(arena, "false", SymbolKind::EnumerationConstant);
        arena.symbol_mut(false_id).type_id = Some(boolean_type);
        arena.symbol_mut(false_id).value = Some(ConstValue::Integer(0));

        let true_id = stack.enter_local(arena, "true", SymbolKind::EnumerationConstant);
        arena.symbol_mut(true_id).type_id = Some(boolean_type);
        arena.symbol_mut(true_id).value = Some(ConstValue::Integer(1));

        if let TypeInfo::Enumeration { constants } = &mut arena.typespec_mut(boolean_type).info {
            constants.push(false_id);
            constants.push(true_id);
        }

        // Standard routines.
        let print_id = enter_standard(arena, stack, "print", RoutineCode::Print, None);
        let println_id = enter_standard(arena, stack, "println", RoutineCode::Println, None);
        let read_id = enter_standard(arena, stack, "read", RoutineCode::Read, Some(string_type));
        let readln_id =
            enter_standard(arena, stack, "readln", RoutineCode::Readln, Some(string_type));

        Self {
            integer_type,
            real_type,
            boolean_type,
            char_type,
            string_type,
            undefined_type,
            integer_id,
            real_id,
            boolean_id,
            char_id,
            string_id,
            false_id,
            true_id,
            print_id,
            println_id,
            read_id,
            readln_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sema::types::TypeForm;

    fn seeded() -> (Arena, ScopeStack, Predefined) {
        let mut arena = Arena::new();
        let mut stack = ScopeStack::new(&mut arena);
        let predefined = Predefined::initialize(&mut arena, &mut stack);
        (arena, stack, predefined)
    }

    #[test]
    fn test_predefined_types_resolve_by_name() {
        let (arena, stack, predefined) = seeded();

        let id = stack.lookup(&arena, "integer").unwrap();
        assert_eq!(arena.symbol(id).type_id, Some(predefined.integer_type));
        assert_eq!(arena.typespec(predefined.integer_type).form, TypeForm::Scalar);
        assert_eq!(
            arena.typespec(predefined.boolean_type).form,
            TypeForm::Enumeration
        );
    }

    #[test]
    fn test_boolean_constants_have_fixed_ordinals() {
        let (arena, _, predefined) = seeded();

        assert_eq!(
            arena.symbol(predefined.false_id).value,
            Some(ConstValue::Integer(0))
        );
        assert_eq!(
            arena.symbol(predefined.true_id).value,
            Some(ConstValue::Integer(1))
        );
        assert_eq!(
            arena.typespec(predefined.boolean_type).enumeration_constants(),
            &[predefined.false_id, predefined.true_id]
        );
    }

    #[test]
    fn test_standard_routines_are_builtin_functions() {
        let (arena, stack, _) = seeded();

        for name in ["print", "println", "read", "readln"] {
            let id = stack.lookup(&arena, name).unwrap();
            let symbol = arena.symbol(id);
            assert_eq!(symbol.kind, SymbolKind::Function);
            assert!(symbol.routine().unwrap().code.is_builtin());
            assert!(symbol.routine().unwrap().params.is_empty());
        }
    }
}
