//! # Naming Module
//!
//! Pure functions that turn raw resource identifiers into the names and paths
//! used by generated code. Nothing here touches the filesystem; the same input
//! always yields the same output, which is what makes repeated generator runs
//! produce identical trees.
//!
//! ## Case conversions
//!
//! | Function | `replica_set` | `ReplicaSet` | `HTTPRoute` |
//! |---|---|---|---|
//! | [`to_pascal_case`] | `ReplicaSet` | `ReplicaSet` | `HTTPRoute` |
//! | [`to_camel_case`] | `replicaSet` | `replicaSet` | `hTTPRoute` |
//! | [`to_snake_case`] | `replica_set` | `replica_set` | `http_route` |
//! | [`to_lower`] | `replica_set` | `replicaset` | `httproute` |
//!
//! Callers must reject empty identifiers before they get here; the functions
//! are total but an empty input produces an empty (useless) name.
//!
//! ## Paths and packages
//!
//! Output directories are `<root>/<group segment>/<version>` and packages are
//! Rust module paths joined with `::`. See [`group_segment`] for how API
//! groups such as `networking.k8s.io` become path-safe segments.

use std::path::{Path, PathBuf};

/// File name of the client file emitted for the root and every group-version.
pub const CLIENT_FILE: &str = "client.rs";

/// Role suffix for a resource's reader file
pub const READER_SUFFIX: &str = "reader";
/// Role suffix for a resource's client file
pub const CLIENT_SUFFIX: &str = "client";
/// Role suffix for a resource's reference file
pub const REFERENCE_SUFFIX: &str = "reference";

fn words(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
}

/// Convert an identifier to PascalCase.
///
/// Splits on any non-alphanumeric character and upper-cases the first letter of
/// each word. Letters after the first are kept as written, so an identifier
/// that is already PascalCase comes back unchanged.
///
/// ```rust
/// use kubegen::naming::to_pascal_case;
/// assert_eq!(to_pascal_case("replica_set"), "ReplicaSet");
/// assert_eq!(to_pascal_case("ReplicaSet"), "ReplicaSet");
/// assert_eq!(to_pascal_case("networking.k8s.io"), "NetworkingK8sIo");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    words(s).map(upper_first).collect()
}

/// Convert an identifier to camelCase (PascalCase with a lowercase first letter).
pub fn to_camel_case(s: &str) -> String {
    lower_first(&to_pascal_case(s))
}

/// Convert an identifier to snake_case.
///
/// Word boundaries are non-alphanumeric characters, a lowercase letter or digit
/// followed by an uppercase letter, and the last capital of an acronym that is
/// followed by a lowercase letter (`HTTPRoute` → `http_route`).
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for word in words(s) {
        if !out.is_empty() {
            out.push('_');
        }
        let chars: Vec<char> = word.chars().collect();
        for (i, &c) in chars.iter().enumerate() {
            if i > 0 && c.is_ascii_uppercase() {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
                if prev.is_ascii_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_ascii_uppercase() && next_is_lower)
                {
                    out.push('_');
                }
            }
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}

/// All-lowercase form.
pub fn to_lower(s: &str) -> String {
    s.to_lowercase()
}

/// All-uppercase form.
pub fn to_upper(s: &str) -> String {
    s.to_uppercase()
}

/// Upper-case only the first character.
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Render a value as a double-quoted, escaped string literal.
pub fn quote(s: &str) -> String {
    format!("{s:?}")
}

/// Make an API group usable as a directory and module name.
///
/// Lower-cases and replaces every non-alphanumeric character with `_`, then
/// trims leading and trailing underscores.
pub fn group_segment(group: &str) -> String {
    group
        .to_lowercase()
        .replace(|c: char| !c.is_ascii_alphanumeric(), "_")
        .trim_matches('_')
        .to_string()
}

/// Output directory of a group-version node.
pub fn group_version_dir(root: &Path, group: &str, version: &str) -> PathBuf {
    root.join(group_segment(group)).join(version)
}

/// Lower-cased kind, used as the stem of every per-resource file.
pub fn resource_stem(kind: &str) -> String {
    to_lower(kind)
}

/// File name of a resource's object file (`pod.rs`).
pub fn object_file_name(kind: &str) -> String {
    format!("{}.rs", resource_stem(kind))
}

/// File name of a resource file for a role suffix (`pod_reader.rs`).
pub fn role_file_name(kind: &str, suffix: &str) -> String {
    format!("{}_{suffix}.rs", resource_stem(kind))
}

/// Module path of a group-version package.
pub fn group_version_package(root_package: &str, group: &str, version: &str) -> String {
    join_package(&[root_package, &group_segment(group), version])
}

/// Short alias for a group-version package (`apps_v1`).
pub fn package_alias(group: &str, version: &str) -> String {
    format!("{}_{}", group_segment(group), version)
}

/// Conventional location of the upstream type for a resource.
pub fn external_package(ecosystem_root: &str, group: &str, version: &str) -> String {
    join_package(&[ecosystem_root, &group_segment(group), version])
}

/// Join module path segments with `::`, skipping empty ones.
pub fn join_package(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| s.trim_matches(':'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("::")
}
