use lazy_static::lazy_static;

/// Kind of value a basic type describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    Void,
    SignedInteger,
    UnsignedInteger,
    Float,
    Boolean,
    /// The meta-type of type expressions.
    Type,
}

impl TypeCategory {
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            TypeCategory::SignedInteger | TypeCategory::UnsignedInteger | TypeCategory::Float
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BuiltinType {
    pub name: &'static str,
    pub category: TypeCategory,
    /// Size in bytes, `None` for types without a runtime representation.
    pub size: Option<u32>,
}

lazy_static! {
    /// Every named basic type. A `Graph` seeds one node per entry and type
    /// identifiers resolve to those nodes by exact name.
    pub static ref BUILTIN_TYPES: Vec<BuiltinType> = vec![
        BuiltinType { name: "void", category: TypeCategory::Void, size: None },
        BuiltinType { name: "i8", category: TypeCategory::SignedInteger, size: Some(1) },
        BuiltinType { name: "i16", category: TypeCategory::SignedInteger, size: Some(2) },
        BuiltinType { name: "i32", category: TypeCategory::SignedInteger, size: Some(4) },
        BuiltinType { name: "i64", category: TypeCategory::SignedInteger, size: Some(8) },
        BuiltinType { name: "u8", category: TypeCategory::UnsignedInteger, size: Some(1) },
        BuiltinType { name: "u16", category: TypeCategory::UnsignedInteger, size: Some(2) },
        BuiltinType { name: "u32", category: TypeCategory::UnsignedInteger, size: Some(4) },
        BuiltinType { name: "u64", category: TypeCategory::UnsignedInteger, size: Some(8) },
        BuiltinType { name: "f32", category: TypeCategory::Float, size: Some(4) },
        BuiltinType { name: "f64", category: TypeCategory::Float, size: Some(8) },
        BuiltinType { name: "bool", category: TypeCategory::Boolean, size: Some(1) },
        BuiltinType { name: "type", category: TypeCategory::Type, size: None },
    ];
}
