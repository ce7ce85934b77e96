//! Path template interpretation.
//!
//! Templates use brace-delimited placeholders (`/v1/items/{id}`). Placeholders
//! are recognised per `/`-separated segment: a segment starting with `{` is a
//! placeholder up to its closing `}`, and whatever follows (`{id}:cancel`) is
//! kept as a literal suffix.

/// Pattern registered with the router. axum parses `{name}` itself.
pub fn to_literal_pattern(template: &str) -> &str {
    template
}

/// `format!` string for client-side URL construction.
///
/// Every placeholder becomes `{}`; braces in literal text are escaped.
/// Arguments are substituted in placeholder order.
pub fn to_interpolation_template(template: &str) -> String {
    template
        .split('/')
        .map(|segment| match placeholder_suffix(segment) {
            Some(suffix) => format!("{{}}{}", escape(suffix)),
            None => escape(segment),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Placeholder names in template order.
pub fn placeholders(template: &str) -> Vec<&str> {
    template
        .split('/')
        .filter(|segment| is_placeholder(segment))
        .map(|segment| {
            let inner = &segment[1..];
            let end = inner.find(['}', '=']).unwrap_or(inner.len());
            &inner[..end]
        })
        .collect()
}

/// Substitute values for placeholders, in order. Mirrors what the generated
/// builder functions do at runtime.
pub fn interpolate(template: &str, values: &[&str]) -> String {
    let mut values = values.iter();
    template
        .split('/')
        .map(|segment| match placeholder_suffix(segment) {
            Some(suffix) => format!("{}{suffix}", values.next().copied().unwrap_or_default()),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_placeholder(segment: &str) -> bool {
    segment.starts_with('{')
}

/// Literal text after the placeholder of a placeholder segment.
fn placeholder_suffix(segment: &str) -> Option<&str> {
    if !is_placeholder(segment) {
        return None;
    }
    Some(segment.find('}').map_or("", |end| &segment[end + 1..]))
}

fn escape(literal: &str) -> String {
    literal.replace('{', "{{").replace('}', "}}")
}
