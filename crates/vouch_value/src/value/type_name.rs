//! Type-name helpers.
//!
//! Values carry the fully qualified name of the type they were built from
//! (as produced by `std::any::type_name`). Matching by type accepts either
//! that name or the *simple* name, which drops every module path, including
//! the ones nested inside generic arguments:
//!
//! ```text
//! alloc::vec::Vec<my_crate::model::User>  =>  Vec<User>
//! ```

/// Strip module paths from a type name, keeping generic structure intact.
pub fn simple_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    let mut chars = full.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_alphanumeric() || c == '_' {
            segment.push(c);
        } else if c == ':' && chars.peek() == Some(&':') {
            // `segment::` is a path prefix; drop it.
            chars.next();
            segment.clear();
        } else {
            out.push_str(&segment);
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(&segment);
    out
}

/// Does `name` denote the type `full`, either verbatim or by simple name?
pub fn type_name_matches(full: &str, name: &str) -> bool {
    full == name || simple_type_name(full) == name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_paths() {
        assert_eq!(simple_type_name("my_crate::model::User"), "User");
        assert_eq!(simple_type_name("i32"), "i32");
    }

    #[test]
    fn strips_paths_inside_generics() {
        assert_eq!(
            simple_type_name("alloc::vec::Vec<my_crate::model::User>"),
            "Vec<User>"
        );
        assert_eq!(
            simple_type_name("Map<alloc::string::String, core::option::Option<u8>>"),
            "Map<String, Option<u8>>"
        );
    }

    #[test]
    fn keeps_references_and_tuples() {
        assert_eq!(simple_type_name("&a::B"), "&B");
        assert_eq!(simple_type_name("(a::B, c::D)"), "(B, D)");
    }

    #[test]
    fn matches_either_form() {
        assert!(type_name_matches("my_crate::User", "User"));
        assert!(type_name_matches("my_crate::User", "my_crate::User"));
        assert!(!type_name_matches("my_crate::User", "Admin"));
    }
}
