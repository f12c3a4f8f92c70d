//! Field-level validation of resource specs.
//!
//! Validation collects every issue instead of stopping at the first one so a
//! single run reports all the problems in a spec document. The tree builder
//! turns a non-empty issue list into [`GenError::InvalidSpec`](crate::GenError).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use super::types::{ResourceRef, ResourceSpec};

static IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").expect("identifier regex should be valid")
});

static VERSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]*$").expect("version regex should be valid"));

/// Kind of problem found in a resource spec
pub mod kinds {
    pub const MISSING_FIELD: &str = "MissingField";
    pub const INVALID_IDENTIFIER: &str = "InvalidIdentifier";
    pub const IDENTITY_CONFLICT: &str = "IdentityConflict";
    pub const PATH_COLLISION: &str = "PathCollision";
}

/// A single problem found in the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Where in the input the issue is (e.g. `resources[2].subResources[0]`)
    pub location: String,
    /// Issue category, one of [`kinds`]
    pub kind: String,
    /// Human-readable description
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        location: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationIssue {
            location: location.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location, self.message)
    }
}

/// Location label for a top-level resource spec.
pub fn resource_location(index: usize) -> String {
    format!("resources[{index}]")
}

/// Location label for a sub-resource reference.
pub fn reference_location(index: usize, sub_index: usize) -> String {
    format!("resources[{index}].subResources[{sub_index}]")
}

fn require(issues: &mut Vec<ValidationIssue>, location: &str, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        issues.push(ValidationIssue::new(
            location,
            kinds::MISSING_FIELD,
            format!("`{field}` is required"),
        ));
        return false;
    }
    true
}

fn check_identity(
    issues: &mut Vec<ValidationIssue>,
    location: &str,
    group: &str,
    version: &str,
    kind: &str,
) {
    if require(issues, location, "group", group)
        && !group.chars().any(|c| c.is_ascii_alphanumeric())
    {
        issues.push(ValidationIssue::new(
            location,
            kinds::INVALID_IDENTIFIER,
            format!("group '{group}' has no alphanumeric characters"),
        ));
    }
    if require(issues, location, "version", version) && !VERSION_REGEX.is_match(version) {
        issues.push(ValidationIssue::new(
            location,
            kinds::INVALID_IDENTIFIER,
            format!("version '{version}' must be lowercase alphanumeric and start with a letter"),
        ));
    }
    if require(issues, location, "kind", kind) && !IDENTIFIER_REGEX.is_match(kind) {
        issues.push(ValidationIssue::new(
            location,
            kinds::INVALID_IDENTIFIER,
            format!("kind '{kind}' must be alphanumeric and start with a letter"),
        ));
    }
}

/// Validate a top-level resource spec: group, version, kind and plural are required.
pub fn validate_resource(index: usize, spec: &ResourceSpec) -> Vec<ValidationIssue> {
    let location = resource_location(index);
    let mut issues = Vec::new();
    check_identity(&mut issues, &location, &spec.group, &spec.version, &spec.kind);
    if require(&mut issues, &location, "pluralKind", &spec.plural_kind)
        && !IDENTIFIER_REGEX.is_match(&spec.plural_kind)
    {
        issues.push(ValidationIssue::new(
            &location,
            kinds::INVALID_IDENTIFIER,
            format!(
                "pluralKind '{}' must be alphanumeric and start with a letter",
                spec.plural_kind
            ),
        ));
    }
    if let Some(list_kind) = spec.list_kind.as_deref() {
        if !list_kind.is_empty() && !IDENTIFIER_REGEX.is_match(list_kind) {
            issues.push(ValidationIssue::new(
                &location,
                kinds::INVALID_IDENTIFIER,
                format!("listKind '{list_kind}' must be alphanumeric and start with a letter"),
            ));
        }
    }
    for (sub_index, reference) in spec.sub_resources.iter().enumerate() {
        issues.extend(validate_reference(index, sub_index, reference));
    }
    issues
}

/// Validate a sub-resource reference: only the identity is required.
pub fn validate_reference(
    index: usize,
    sub_index: usize,
    reference: &ResourceRef,
) -> Vec<ValidationIssue> {
    let location = reference_location(index, sub_index);
    let mut issues = Vec::new();
    check_identity(
        &mut issues,
        &location,
        &reference.group,
        &reference.version,
        &reference.kind,
    );
    issues
}

/// Validate every spec in input order.
pub fn validate_specs(specs: &[ResourceSpec]) -> Vec<ValidationIssue> {
    specs
        .iter()
        .enumerate()
        .flat_map(|(i, spec)| validate_resource(i, spec))
        .collect()
}

/// Print issues to stderr in a human-readable block.
pub fn print_issues(issues: &[ValidationIssue]) {
    eprintln!(
        "\n❌ Resource spec validation failed. {} issue(s) found:\n",
        issues.len()
    );
    for issue in issues {
        eprintln!("{issue}");
    }
    eprintln!();
}
