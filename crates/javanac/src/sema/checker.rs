//! Pure type predicates and mappings
//!
//! These functions operate on already-resolved data; none of them touch
//! the scope stack or report errors.

use super::arena::Arena;
use super::predefined::Predefined;
use super::symbol::ConstValue;
use super::types::{TypeForm, TypeId, Typespec};

/// Map a compile-time value to its predefined type
pub fn type_of_value(predefined: &Predefined, value: &ConstValue) -> TypeId {
    match value {
        ConstValue::Integer(_) => predefined.integer_type,
        ConstValue::Real(_) => predefined.real_type,
        ConstValue::Boolean(_) => predefined.boolean_type,
        ConstValue::Character(_) => predefined.char_type,
        ConstValue::Str(_) => predefined.string_type,
    }
}

/// Map a scalar type keyword or its one-dimensional array spelling to a
/// type
///
/// Array spellings build a fresh unsized array type on each call. Unknown
/// spellings return `None`; the caller then attempts a named-type lookup
/// before reporting anything.
pub fn type_from_keyword(
    arena: &mut Arena,
    predefined: &Predefined,
    spelling: &str,
) -> Option<TypeId> {
    let scalar = |name: &str| match name {
        "int" => Some(predefined.integer_type),
        "bool" => Some(predefined.boolean_type),
        "string" => Some(predefined.string_type),
        "real" => Some(predefined.real_type),
        "char" => Some(predefined.char_type),
        _ => None,
    };

    if let Some(element) = spelling.strip_suffix("[]") {
        let element = scalar(element)?;
        return Some(arena.add_type(Typespec::array(element, predefined.integer_type, 0)));
    }
    scalar(spelling)
}

pub fn is_integer(predefined: &Predefined, type_id: TypeId) -> bool {
    type_id == predefined.integer_type
}

pub fn is_real(predefined: &Predefined, type_id: TypeId) -> bool {
    type_id == predefined.real_type
}

pub fn is_boolean(predefined: &Predefined, type_id: TypeId) -> bool {
    type_id == predefined.boolean_type
}

pub fn is_string(predefined: &Predefined, type_id: TypeId) -> bool {
    type_id == predefined.string_type
}

pub fn is_char(predefined: &Predefined, type_id: TypeId) -> bool {
    type_id == predefined.char_type
}

pub fn is_numeric(predefined: &Predefined, type_id: TypeId) -> bool {
    is_integer(predefined, type_id) || is_real(predefined, type_id)
}

/// True when a value of `value` type may be assigned to a target of
/// `target` type: identical identity, integer widening into real, or
/// shallow-nominal array element agreement
pub fn assignment_compatible(
    arena: &Arena,
    predefined: &Predefined,
    target: TypeId,
    value: TypeId,
) -> bool {
    if target == value {
        return true;
    }
    if is_real(predefined, target) && is_integer(predefined, value) {
        return true;
    }

    // Arrays match on element identity alone; counts and descriptor
    // identity are ignored. Records only ever match on identity, covered
    // by the equality test above.
    let target_spec = arena.typespec(target);
    let value_spec = arena.typespec(value);
    if target_spec.form == TypeForm::Array && value_spec.form == TypeForm::Array {
        return target_spec.element_type() == value_spec.element_type();
    }

    false
}

/// True when two operand types may be compared: identical scalar or
/// enumeration identity, or a numeric mix
pub fn comparison_compatible(
    arena: &Arena,
    predefined: &Predefined,
    left: TypeId,
    right: TypeId,
) -> bool {
    if is_numeric(predefined, left) && is_numeric(predefined, right) {
        return true;
    }
    if left != right {
        return false;
    }
    matches!(
        arena.typespec(left).form,
        TypeForm::Scalar | TypeForm::Enumeration
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sema::scope::ScopeStack;
    use crate::sema::types::Typespec;

    fn seeded() -> (Arena, Predefined) {
        let mut arena = Arena::new();
        let mut stack = ScopeStack::new(&mut arena);
        let predefined = Predefined::initialize(&mut arena, &mut stack);
        (arena, predefined)
    }

    #[test]
    fn test_type_of_value() {
        let (_, predefined) = seeded();

        assert_eq!(
            type_of_value(&predefined, &ConstValue::Integer(1)),
            predefined.integer_type
        );
        assert_eq!(
            type_of_value(&predefined, &ConstValue::Boolean(true)),
            predefined.boolean_type
        );
        assert_eq!(
            type_of_value(&predefined, &ConstValue::Str("s".into())),
            predefined.string_type
        );
    }

    #[test]
    fn test_type_from_keyword() {
        let (mut arena, predefined) = seeded();

        assert_eq!(
            type_from_keyword(&mut arena, &predefined, "int"),
            Some(predefined.integer_type)
        );
        assert_eq!(
            type_from_keyword(&mut arena, &predefined, "bool"),
            Some(predefined.boolean_type)
        );
        assert_eq!(type_from_keyword(&mut arena, &predefined, "Point"), None);

        let array = type_from_keyword(&mut arena, &predefined, "int[]").unwrap();
        let spec = arena.typespec(array);
        assert_eq!(spec.element_type(), Some(predefined.integer_type));
        assert_eq!(spec.element_count(), Some(0));
    }

    #[test]
    fn test_assignment_compatibility() {
        let (arena, predefined) = seeded();

        // Reflexive for every predefined type.
        for ty in [
            predefined.integer_type,
            predefined.real_type,
            predefined.boolean_type,
            predefined.char_type,
            predefined.string_type,
        ] {
            assert!(assignment_compatible(&arena, &predefined, ty, ty));
        }

        // Integer widens into real, not the reverse.
        assert!(assignment_compatible(
            &arena,
            &predefined,
            predefined.real_type,
            predefined.integer_type
        ));
        assert!(!assignment_compatible(
            &arena,
            &predefined,
            predefined.integer_type,
            predefined.real_type
        ));
        assert!(!assignment_compatible(
            &arena,
            &predefined,
            predefined.string_type,
            predefined.integer_type
        ));
    }

    #[test]
    fn test_array_compatibility_is_shallow_nominal() {
        let (mut arena, predefined) = seeded();

        let a = arena.add_type(Typespec::array(
            predefined.integer_type,
            predefined.integer_type,
            5,
        ));
        let b = arena.add_type(Typespec::array(
            predefined.integer_type,
            predefined.integer_type,
            0,
        ));
        let c = arena.add_type(Typespec::array(
            predefined.string_type,
            predefined.integer_type,
            5,
        ));

        // Same element identity matches regardless of count or descriptor.
        assert!(assignment_compatible(&arena, &predefined, a, b));
        assert!(!assignment_compatible(&arena, &predefined, a, c));
    }

    #[test]
    fn test_comparison_compatibility() {
        let (mut arena, predefined) = seeded();

        assert!(comparison_compatible(
            &arena,
            &predefined,
            predefined.integer_type,
            predefined.real_type
        ));
        assert!(comparison_compatible(
            &arena,
            &predefined,
            predefined.boolean_type,
            predefined.boolean_type
        ));
        assert!(!comparison_compatible(
            &arena,
            &predefined,
            predefined.integer_type,
            predefined.boolean_type
        ));

        // Arrays never compare.
        let array = arena.add_type(Typespec::array(
            predefined.integer_type,
            predefined.integer_type,
            3,
        ));
        assert!(!comparison_compatible(&arena, &predefined, array, array));
    }
}
