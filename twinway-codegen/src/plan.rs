//! Ordered extraction steps populating a request message for one binding.
//!
//! Steps always run query first, body second and path last. Path-bound names
//! are excluded from the query scan (through the bound-params table, or an
//! inline list for wildcard bindings), so the query scan never writes a field
//! the path will own.

use crate::classify::classify;
use crate::model::{Binding, Body};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Populate fields from query keys. `bound_params` is the lowercase
    /// exclusion table; `None` means a wildcard binding, which accepts every
    /// key except the lowercase `path_params`.
    QueryScan {
        bound_params: Option<Vec<String>>,
        path_params: Vec<String>,
    },
    /// Decode the payload into the designated sub-tree.
    BodyDecode(Body),
    /// Populate fields from the router's path parameters.
    PathScan,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnmarshalPlan {
    pub steps: Vec<Step>,
}

impl UnmarshalPlan {
    pub fn query_scan(&self) -> Option<&Step> {
        self.steps
            .iter()
            .find(|step| matches!(step, Step::QueryScan { .. }))
    }

    /// Whether a query key would be written by the query scan.
    pub fn scans_query_key(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        match self.query_scan() {
            Some(Step::QueryScan {
                bound_params: Some(bound),
                ..
            }) => !bound.contains(&key),
            Some(Step::QueryScan { path_params, .. }) => !path_params.contains(&key),
            _ => false,
        }
    }

    /// Keys the query scan skips, i.e. the bound-params table or, for a
    /// wildcard binding, the path-bound names.
    pub fn query_exclusions(&self) -> Option<&[String]> {
        match self.query_scan()? {
            Step::QueryScan {
                bound_params: Some(bound),
                ..
            } => Some(bound.as_slice()),
            Step::QueryScan { path_params, .. } => Some(path_params.as_slice()),
            _ => None,
        }
    }
}

/// Lowercased, de-duplicated union of path-param fields and explicit query
/// params, in declaration order. `None` for wildcard bindings.
pub fn bound_params(binding: &Binding) -> Option<Vec<String>> {
    if binding.has_wildcard_query() {
        return None;
    }
    let mut table: Vec<String> = Vec::new();
    let names = binding
        .path_params
        .iter()
        .map(|p| p.field.as_str())
        .chain(binding.explicit_params.iter().map(String::as_str));
    for name in names {
        let name = name.to_lowercase();
        if !table.contains(&name) {
            table.push(name);
        }
    }
    Some(table)
}

fn path_names(binding: &Binding) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for param in &binding.path_params {
        let name = param.field.to_lowercase();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

pub fn plan(binding: &Binding) -> UnmarshalPlan {
    let classification = classify(binding);
    let mut steps = Vec::new();

    if classification.has_wildcard_query {
        steps.push(Step::QueryScan {
            bound_params: None,
            path_params: path_names(binding),
        });
    } else if !classification.explicit_params.is_empty() {
        steps.push(Step::QueryScan {
            bound_params: bound_params(binding),
            path_params: Vec::new(),
        });
    }
    if let Some(body) = &binding.body {
        steps.push(Step::BodyDecode(body.clone()));
    }
    if classification.has_path_params {
        steps.push(Step::PathScan);
    }

    UnmarshalPlan { steps }
}

/// Lowercase keys a client must leave out of the query string: whatever the
/// query scan skips plus the body root. `None` when the binding reads nothing
/// from the query or the whole message travels as the body.
pub fn client_query_exclusions(binding: &Binding) -> Option<Vec<String>> {
    let plan = plan(binding);
    let mut exclusions = plan.query_exclusions()?.to_vec();
    if let Some(body) = &binding.body {
        if body.is_whole() {
            return None;
        }
        let root = body
            .field_path
            .iter()
            .map(|f| f.name.to_lowercase())
            .collect::<Vec<_>>()
            .join(".");
        if !exclusions.contains(&root) {
            exclusions.push(root);
        }
    }
    Some(exclusions)
}
