//! Partitioning of a binding's request fields by parameter source.

use crate::model::{Binding, WILDCARD};

/// Decision record consumed by the unmarshal planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'a> {
    pub has_body: bool,
    pub has_path_params: bool,
    pub has_wildcard_query: bool,
    /// Explicit query params, without the wildcard marker.
    pub explicit_params: Vec<&'a str>,
}

/// Where a request field takes its value from under one binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    Path,
    Body,
    /// Listed in the bound-params table, so skipped by the generic query scan.
    ExplicitQuery,
    /// Filled by the generic query scan.
    Query,
    Unbound,
}

pub fn classify(binding: &Binding) -> Classification<'_> {
    Classification {
        has_body: binding.body.is_some(),
        has_path_params: !binding.path_params.is_empty(),
        has_wildcard_query: binding.has_wildcard_query(),
        explicit_params: binding
            .explicit_params
            .iter()
            .map(String::as_str)
            .filter(|p| *p != WILDCARD)
            .collect(),
    }
}

/// Source of a (dotted) request field. Path binding always wins.
pub fn field_source(binding: &Binding, field: &str) -> FieldSource {
    if binding.path_params.iter().any(|p| p.field == field) {
        return FieldSource::Path;
    }
    if let Some(body) = &binding.body {
        let root: Vec<&str> = body.field_path.iter().map(|f| f.name.as_str()).collect();
        let segments: Vec<&str> = field.split('.').collect();
        if segments.starts_with(&root) {
            return FieldSource::Body;
        }
    }
    if binding.has_wildcard_query() {
        return FieldSource::Query;
    }
    if binding.explicit_params.iter().any(|p| p == field) {
        return FieldSource::ExplicitQuery;
    }
    if binding.explicit_params.is_empty() {
        FieldSource::Unbound
    } else {
        FieldSource::Query
    }
}
