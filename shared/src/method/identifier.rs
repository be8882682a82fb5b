//! Stable, human readable method identifiers.
//!
//! Static methods are identified as `<TypeFullName>.<MethodName>`. Instance
//! methods use the bare method name; the target object supplies the type.

/// Formats the identifier of a static method
pub fn static_identifier(type_full_name: &str, method_name: &str) -> String {
    format!("{}.{}", type_full_name, method_name)
}

/// Splits a static identifier on its last `.` into type name and method name.
/// An identifier without a `.` yields an empty type name.
pub fn split_static_identifier(identifier: &str) -> (&str, &str) {
    identifier.rsplit_once('.').unwrap_or(("", identifier))
}

/// The unqualified name of a type, i.e. everything after the last `.`
pub fn short_type_name(type_full_name: &str) -> &str {
    split_static_identifier(type_full_name).1
}
