//! Mapping of descriptor-level identifiers onto Rust identifiers and types.

use heck::{ToSnakeCase, ToUpperCamelCase};
use proc_macro2::{Ident, Span};

use crate::model::{ScalarType, TypeRef};

/// Rust keywords that prost and tonic escape in generated identifiers.
///
/// Kept sorted; this is the only shared table in the engine and it is never
/// written after compilation.
static KEYWORDS: &[&str] = &[
    "Self", "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
    "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if",
    "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv",
    "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers and get a trailing underscore.
const UNRAWABLE: &[&str] = &["Self", "crate", "self", "super"];

/// Rust type used for a scalar field in generated signatures.
pub fn primitive_type(ty: ScalarType) -> &'static str {
    match ty {
        ScalarType::Double => "f64",
        ScalarType::Float => "f32",
        ScalarType::Int64 | ScalarType::Sint64 | ScalarType::Sfixed64 => "i64",
        ScalarType::Uint64 | ScalarType::Fixed64 => "u64",
        ScalarType::Int32 | ScalarType::Sint32 | ScalarType::Sfixed32 | ScalarType::Enum => "i32",
        ScalarType::Uint32 | ScalarType::Fixed32 => "u32",
        ScalarType::Bool => "bool",
        ScalarType::String => "String",
        ScalarType::Bytes => "Vec<u8>",
    }
}

/// `my.lovely_pkg.strings` -> `My.LovelyPkg.Strings`.
pub fn camel_case_path(dotted: &str) -> String {
    dotted
        .split('.')
        .map(|segment| segment.to_upper_camel_case())
        .collect::<Vec<_>>()
        .join(".")
}

/// Replace path-unsafe characters so the result can be part of an identifier.
pub fn var_name(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '.' | '/' | '-' => '_',
            c => c,
        })
        .collect()
}

/// Stem shared by every symbol generated for one binding.
pub fn symbol_key(service: &str, method: &str, index: usize) -> String {
    format!(
        "{}_{}_{}",
        var_name(service).to_snake_case(),
        var_name(method).to_snake_case(),
        index
    )
}

pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.binary_search(&s).is_ok()
}

/// Escape a snake_case name the way prost does.
pub fn sanitize(name: &str) -> String {
    if UNRAWABLE.contains(&name) {
        format!("{name}_")
    } else if is_keyword(name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

/// Identifier of a message field (prost naming).
pub fn field_ident(name: &str) -> Ident {
    ident(&sanitize(&name.to_snake_case()))
}

/// Identifier of an RPC method on the tonic server trait.
pub fn method_ident(name: &str) -> Ident {
    ident(&sanitize(&name.to_snake_case()))
}

/// Identifier for a builder argument bound to a (possibly nested) field.
pub fn param_ident(field_path: &str) -> Ident {
    ident(&sanitize(&var_name(field_path).to_snake_case()))
}

/// Build an identifier, honouring a leading `r#`.
pub fn ident(name: &str) -> Ident {
    match name.strip_prefix("r#") {
        Some(raw) => Ident::new_raw(raw, Span::call_site()),
        None => Ident::new(name, Span::call_site()),
    }
}

/// Rust path of a message type as seen from code living in `from_package`.
///
/// Follows prost-build: packages become snake_case modules reached through
/// `super::` hops, nested messages live in a module named after their parent,
/// and well-known types come from `prost_types`. When `base` is given the
/// relative path is made absolute against that module path.
pub fn rust_type_path(ty: &TypeRef, from_package: &str, base: Option<&str>) -> String {
    if ty.package == "google.protobuf" {
        return match ty.name.as_str() {
            "Empty" => "()".to_string(),
            name => format!("::prost_types::{}", name.to_upper_camel_case()),
        };
    }

    let from: Vec<&str> = split_package(from_package);
    let to: Vec<&str> = split_package(&ty.package);
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut segments: Vec<String> = Vec::new();
    segments.extend(std::iter::repeat("super".to_string()).take(from.len() - common));
    segments.extend(to[common..].iter().map(|s| sanitize(&s.to_snake_case())));

    let mut names = ty.name.split('.').peekable();
    while let Some(name) = names.next() {
        if names.peek().is_some() {
            segments.push(sanitize(&name.to_snake_case()));
        } else {
            segments.push(name.to_upper_camel_case());
        }
    }

    match base {
        Some(base) => absolutize(base, segments),
        None => segments.join("::"),
    }
}

fn split_package(package: &str) -> Vec<&str> {
    package.split('.').filter(|s| !s.is_empty()).collect()
}

fn absolutize(base: &str, segments: Vec<String>) -> String {
    let mut path: Vec<String> = base
        .split("::")
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    let absolute = base.starts_with("::");
    let mut rest = segments.into_iter().peekable();
    while rest.peek().map(String::as_str) == Some("super") && path.len() > 1 {
        rest.next();
        path.pop();
    }
    path.extend(rest);
    let joined = path.join("::");
    if absolute {
        format!("::{joined}")
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_is_sorted() {
        let mut sorted = KEYWORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, KEYWORDS);
    }

    #[test]
    fn symbol_names_are_identifier_safe() {
        assert_eq!(camel_case_path("my.lovely_pkg.strings"), "My.LovelyPkg.Strings");
        assert_eq!(var_name("a.b/c-d"), "a_b_c_d");
        assert_eq!(symbol_key("Strings", "ToUpper", 1), "strings_to_upper_1");
        assert_eq!(primitive_type(ScalarType::Sint64), "i64");
        assert_eq!(primitive_type(ScalarType::Enum), "i32");
    }

    #[test]
    fn type_paths_follow_prost_layout() {
        let same = TypeRef::new("shop.items", "Outer.Inner");
        assert_eq!(rust_type_path(&same, "shop.items", None), "outer::Inner");
        let other = TypeRef::new("shop.common", "Money");
        assert_eq!(rust_type_path(&other, "shop.items", None), "super::common::Money");
        assert_eq!(
            rust_type_path(&other, "shop.items", Some("crate::pb::shop::items")),
            "crate::pb::shop::common::Money"
        );
        let empty = TypeRef::new("google.protobuf", "Empty");
        assert_eq!(rust_type_path(&empty, "shop", None), "()");
    }

    #[test]
    fn sanitize_matches_prost() {
        assert_eq!(sanitize("type"), "r#type");
        assert_eq!(sanitize("self"), "self_");
        assert_eq!(sanitize("name"), "name");
    }

    #[test]
    fn absolutize_pops_super_hops() {
        assert_eq!(
            absolutize("crate::pb::a::b", vec!["super".into(), "c".into(), "Msg".into()]),
            "crate::pb::a::c::Msg"
        );
        assert_eq!(absolutize("::pb", vec!["Msg".into()]), "::pb::Msg");
    }
}
