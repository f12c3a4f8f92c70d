use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether instances of a resource live inside a namespace or at cluster scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Instances belong to a namespace (the Kubernetes default)
    #[default]
    #[serde(alias = "namespaced")]
    Namespaced,
    /// Instances are cluster-wide
    #[serde(alias = "cluster", alias = "ClusterScoped")]
    Cluster,
}

impl Scope {
    /// `true` for [`Scope::Namespaced`]
    pub fn is_namespaced(self) -> bool {
        matches!(self, Scope::Namespaced)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Namespaced => write!(f, "Namespaced"),
            Scope::Cluster => write!(f, "Cluster"),
        }
    }
}

/// Identity of a resource: `(group, version, kind)`
///
/// Ordering is lexicographic over the three fields, which is the order the
/// generator visits resources in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    /// API group (e.g. `apps`)
    pub group: String,
    /// API version (e.g. `v1`)
    pub version: String,
    /// Kind (e.g. `Deployment`)
    pub kind: String,
}

impl ResourceKey {
    pub fn new(group: impl Into<String>, version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// Composite `group/version` key used to index group-version nodes.
    pub fn group_version(&self) -> String {
        group_version_key(&self.group, &self.version)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.group, self.version, self.kind)
    }
}

/// Composite key of a group-version pair.
pub fn group_version_key(group: &str, version: &str) -> String {
    format!("{group}/{version}")
}

/// A link from one resource spec to another that it owns instances of
///
/// Only the identity is required; the referenced resource must also be
/// declared as a top-level spec for the link to take effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRef {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub kind: String,
    /// Informational only; the registered node's plural is authoritative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural_kind: Option<String>,
}

impl ResourceRef {
    pub fn new(group: impl Into<String>, version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
            plural_kind: None,
        }
    }

    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(&self.group, &self.version, &self.kind)
    }
}

/// Input description of one API resource kind to generate code for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpec {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub kind: String,
    /// Defaults to `<Kind>List`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_kind: Option<String>,
    #[serde(default)]
    pub plural_kind: String,
    #[serde(default)]
    pub scope: Scope,
    /// Module path of the upstream type; defaults to `<ecosystemRoot>::<group>::<version>`
    #[serde(default, rename = "package", skip_serializing_if = "Option::is_none")]
    pub package_override: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_resources: Vec<ResourceRef>,
}

impl ResourceSpec {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
        plural_kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
            plural_kind: plural_kind.into(),
            ..Self::default()
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_list_kind(mut self, list_kind: impl Into<String>) -> Self {
        self.list_kind = Some(list_kind.into());
        self
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package_override = Some(package.into());
        self
    }

    pub fn with_sub_resource(mut self, reference: ResourceRef) -> Self {
        self.sub_resources.push(reference);
        self
    }

    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(&self.group, &self.version, &self.kind)
    }

    /// The list kind with its default applied.
    pub fn effective_list_kind(&self) -> String {
        self.list_kind
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("{}List", self.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_accepts_aliases() {
        let scopes: Vec<Scope> =
            serde_yaml::from_str("[Namespaced, namespaced, Cluster, cluster, ClusterScoped]").unwrap();
        assert_eq!(
            scopes,
            vec![
                Scope::Namespaced,
                Scope::Namespaced,
                Scope::Cluster,
                Scope::Cluster,
                Scope::Cluster
            ]
        );
        assert!(Scope::default().is_namespaced());
    }

    #[test]
    fn test_list_kind_defaults_from_kind() {
        let spec = ResourceSpec::new("apps", "v1", "Deployment", "Deployments");
        assert_eq!(spec.effective_list_kind(), "DeploymentList");
        assert_eq!(spec.clone().with_list_kind("").effective_list_kind(), "DeploymentList");
        assert_eq!(spec.with_list_kind("Deployments").effective_list_kind(), "Deployments");
    }

    #[test]
    fn test_key_display_and_group_version() {
        let key = ResourceSpec::new("apps", "v1", "Deployment", "Deployments").key();
        assert_eq!(key.to_string(), "apps/v1/Deployment");
        assert_eq!(key.group_version(), "apps/v1");
        assert_eq!(ResourceRef::new("apps", "v1", "Deployment").key(), key);
    }

    #[test]
    fn test_camel_case_field_names() {
        let spec: ResourceSpec = serde_json::from_str(
            r#"{"group":"apps","version":"v1","kind":"Deployment","pluralKind":"Deployments",
                "listKind":"DeploymentList","package":"my::apps",
                "subResources":[{"group":"apps","version":"v1","kind":"ReplicaSet"}]}"#,
        )
        .unwrap();
        assert_eq!(spec.plural_kind, "Deployments");
        assert_eq!(spec.package_override.as_deref(), Some("my::apps"));
        assert_eq!(spec.sub_resources[0].kind, "ReplicaSet");
        assert!(spec.sub_resources[0].plural_kind.is_none());
    }
}
