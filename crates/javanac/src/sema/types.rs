//! Type descriptors

use super::scope::ScopeId;
use super::symbol::SymbolId;
use std::fmt;

/// Handle to a [`Typespec`] in the semantic arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Structural category of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeForm {
    Scalar,
    Enumeration,
    Array,
    Record,
}

impl fmt::Display for TypeForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Scalar => "scalar",
            Self::Enumeration => "enumeration",
            Self::Array => "array",
            Self::Record => "record",
        };
        write!(f, "{}", text)
    }
}

/// Per-form composition data
#[derive(Debug, Clone)]
pub enum TypeInfo {
    Scalar,

    Enumeration {
        /// Member constants in declaration order; the position of a member
        /// in this list is its ordinal
        constants: Vec<SymbolId>,
    },

    Array {
        element: TypeId,
        /// Index type; always `integer` in this language
        index: TypeId,
        /// Fixed element count; 0 means unsized (runtime-computed length)
        count: usize,
    },

    Record {
        /// Scope holding the record's field entries
        fields: ScopeId,
        /// Dollar-joined nominal key rooted at the program, e.g.
        /// `P$Outer$Inner`; globally unique across one analysis run
        type_path: String,
    },
}

/// A datatype descriptor: form, identity and composition
///
/// Created once when a type name, record declaration or array expression is
/// first elaborated, and immutable afterward apart from elaboration-time
/// wiring (identifier binding, enumeration members, record type path).
#[derive(Debug, Clone)]
pub struct Typespec {
    pub form: TypeForm,
    /// The symbol that names this type; anonymous for array expressions
    pub identifier: Option<SymbolId>,
    pub info: TypeInfo,
}

impl Typespec {
    pub fn scalar() -> Self {
        Self {
            form: TypeForm::Scalar,
            identifier: None,
            info: TypeInfo::Scalar,
        }
    }

    pub fn enumeration() -> Self {
        Self {
            form: TypeForm::Enumeration,
            identifier: None,
            info: TypeInfo::Enumeration {
                constants: Vec::new(),
            },
        }
    }

    pub fn array(element: TypeId, index: TypeId, count: usize) -> Self {
        Self {
            form: TypeForm::Array,
            identifier: None,
            info: TypeInfo::Array {
                element,
                index,
                count,
            },
        }
    }

    pub fn record(fields: ScopeId) -> Self {
        Self {
            form: TypeForm::Record,
            identifier: None,
            info: TypeInfo::Record {
                fields,
                type_path: String::new(),
            },
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.form == TypeForm::Scalar
    }

    pub fn is_enumeration(&self) -> bool {
        self.form == TypeForm::Enumeration
    }

    pub fn is_array(&self) -> bool {
        self.form == TypeForm::Array
    }

    pub fn is_record(&self) -> bool {
        self.form == TypeForm::Record
    }

    /// Element type of an array form
    pub fn element_type(&self) -> Option<TypeId> {
        match &self.info {
            TypeInfo::Array { element, .. } => Some(*element),
            _ => None,
        }
    }

    /// Element count of an array form; 0 means unsized
    pub fn element_count(&self) -> Option<usize> {
        match &self.info {
            TypeInfo::Array { count, .. } => Some(*count),
            _ => None,
        }
    }

    /// Field scope of a record form
    pub fn field_scope(&self) -> Option<ScopeId> {
        match &self.info {
            TypeInfo::Record { fields, .. } => Some(*fields),
            _ => None,
        }
    }

    /// Nominal key of a record form
    pub fn type_path(&self) -> Option<&str> {
        match &self.info {
            TypeInfo::Record { type_path, .. } => Some(type_path),
            _ => None,
        }
    }

    /// Member constants of an enumeration form, in ordinal order
    pub fn enumeration_constants(&self) -> &[SymbolId] {
        match &self.info {
            TypeInfo::Enumeration { constants } => constants,
            _ => &[],
        }
    }
}
