use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::naming;
use crate::spec::{group_version_key, ResourceKey, ResourceSpec, Scope};

/// Inputs every derived path and package is a function of
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Directory the generated tree is written under
    pub root_path: PathBuf,
    /// Module path of the generated tree's root (e.g. `crate::generated`)
    pub root_package: String,
    /// Module path under which upstream types live by convention
    pub ecosystem_root: String,
}

impl Layout {
    pub const DEFAULT_ROOT_PATH: &'static str = "generated";
    pub const DEFAULT_ROOT_PACKAGE: &'static str = "crate::generated";
    pub const DEFAULT_ECOSYSTEM_ROOT: &'static str = "k8s_openapi::api";

    pub fn new(root_path: impl Into<PathBuf>, root_package: impl Into<String>) -> Self {
        Self {
            root_path: root_path.into(),
            root_package: root_package.into(),
            ecosystem_root: Self::DEFAULT_ECOSYSTEM_ROOT.to_string(),
        }
    }

    pub fn with_ecosystem_root(mut self, ecosystem_root: impl Into<String>) -> Self {
        self.ecosystem_root = ecosystem_root.into();
        self
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROOT_PATH, Self::DEFAULT_ROOT_PACKAGE)
    }
}

/// Capability of nodes that carry a resource identity.
///
/// Lets callers ask any resource-bearing node for its `(group, version, kind)`
/// without knowing which node type it is.
pub trait Identified {
    fn identity(&self) -> &ResourceKey;

    /// Display label, `group/version/Kind`.
    fn label(&self) -> String {
        self.identity().to_string()
    }
}

/// Root of the options tree
#[derive(Debug, Clone, Serialize)]
pub struct RootNode {
    /// Output directory
    pub location: PathBuf,
    /// Destination of the root client file
    pub file: PathBuf,
    pub package: String,
    pub client_type: String,
    /// Group-version nodes keyed by `group/version`
    pub group_versions: BTreeMap<String, GroupVersionNode>,
    /// Sub-resource references that named an unregistered resource
    #[serde(skip)]
    pub dropped_references: Vec<DroppedReference>,
}

impl RootNode {
    pub const CLIENT_TYPE: &'static str = "Clientset";

    pub fn new(layout: &Layout) -> Self {
        Self {
            location: layout.root_path.clone(),
            file: layout.root_path.join(naming::CLIENT_FILE),
            package: layout.root_package.clone(),
            client_type: Self::CLIENT_TYPE.to_string(),
            group_versions: BTreeMap::new(),
            dropped_references: Vec::new(),
        }
    }

    pub fn group_version(&self, group: &str, version: &str) -> Option<&GroupVersionNode> {
        self.group_versions.get(&group_version_key(group, version))
    }

    pub fn resource(&self, key: &ResourceKey) -> Option<&ResourceNode> {
        self.group_versions
            .get(&key.group_version())
            .and_then(|gv| gv.resources.get(&key.kind))
    }

    pub fn resource_mut(&mut self, key: &ResourceKey) -> Option<&mut ResourceNode> {
        self.group_versions
            .get_mut(&key.group_version())
            .and_then(|gv| gv.resources.get_mut(&key.kind))
    }

    /// Every resource node in visiting order.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceNode> {
        self.group_versions
            .values()
            .flat_map(|gv| gv.resources.values())
    }

    pub fn resource_count(&self) -> usize {
        self.group_versions.values().map(|gv| gv.resources.len()).sum()
    }
}

/// One API group-version and the resources registered under it
#[derive(Debug, Clone, Serialize)]
pub struct GroupVersionNode {
    pub group: String,
    pub version: String,
    /// Path- and module-safe group name
    pub segment: String,
    pub package: String,
    pub alias: String,
    pub client_type: String,
    /// Output directory
    pub location: PathBuf,
    /// Destination of the group-version client file
    pub file: PathBuf,
    /// Resource nodes keyed by kind
    pub resources: BTreeMap<String, ResourceNode>,
}

impl GroupVersionNode {
    pub fn new(layout: &Layout, group: &str, version: &str) -> Self {
        let segment = naming::group_segment(group);
        let location = naming::group_version_dir(&layout.root_path, group, version);
        Self {
            group: group.to_string(),
            version: version.to_string(),
            client_type: format!(
                "{}{}Client",
                naming::to_pascal_case(&segment),
                naming::to_pascal_case(version)
            ),
            segment,
            package: naming::group_version_package(&layout.root_package, group, version),
            alias: naming::package_alias(group, version),
            file: location.join(naming::CLIENT_FILE),
            location,
            resources: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> String {
        group_version_key(&self.group, &self.version)
    }
}

/// Names derived once from a resource's kind and plural
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceNames {
    pub kind: String,
    pub plural: String,
    /// Lower-cased kind, the stem of every file for this resource
    pub stem: String,
    pub type_name: String,
    pub snake: String,
    pub plural_snake: String,
    /// Lower-cased plural, the resource name on the wire
    pub plural_name: String,
}

impl ResourceNames {
    pub fn derive(kind: &str, plural: &str) -> Self {
        Self {
            kind: kind.to_string(),
            plural: plural.to_string(),
            stem: naming::resource_stem(kind),
            type_name: naming::to_pascal_case(kind),
            snake: naming::to_snake_case(kind),
            plural_snake: naming::to_snake_case(plural),
            plural_name: naming::to_lower(plural),
        }
    }
}

/// The unit of generation for one resource kind
#[derive(Debug, Clone, Serialize)]
pub struct ResourceNode {
    pub key: ResourceKey,
    pub names: ResourceNames,
    pub scope: Scope,
    pub client: ClientSubNode,
    pub reader: ReaderSubNode,
    pub object: ObjectSubNode,
    /// Present only when another resource lists this one as a sub-resource
    pub reference: Option<ReferenceSubNode>,
    /// Resources this one declared as sub-resources, in declaration order
    pub references: Vec<ResourceKey>,
}

impl ResourceNode {
    pub fn new(layout: &Layout, gv: &GroupVersionNode, spec: &ResourceSpec) -> Self {
        let key = spec.key();
        let names = ResourceNames::derive(&spec.kind, &spec.plural_kind);
        let namespaced = spec.scope.is_namespaced();
        let source_package = spec
            .package_override
            .clone()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| {
                naming::external_package(&layout.ecosystem_root, &spec.group, &spec.version)
            });

        let object = ObjectSubNode {
            file: gv.location.join(naming::object_file_name(&spec.kind)),
            module: naming::join_package(&[&gv.package, &names.stem]),
            type_name: names.type_name.clone(),
            marker_type: format!("{}Kind", names.type_name),
            identity: key.clone(),
            list_kind: spec.effective_list_kind(),
            plural_name: names.plural_name.clone(),
            namespaced,
            source_package,
        };
        let reader = ReaderSubNode {
            file: role_file(&gv.location, &spec.kind, naming::READER_SUFFIX),
            module: role_module(&gv.package, &names.stem, naming::READER_SUFFIX),
            type_name: format!("{}Reader", names.type_name),
            object_type: object.type_name.clone(),
            object_module: object.module.clone(),
            namespaced,
        };
        let client = ClientSubNode {
            file: role_file(&gv.location, &spec.kind, naming::CLIENT_SUFFIX),
            module: role_module(&gv.package, &names.stem, naming::CLIENT_SUFFIX),
            type_name: format!("{}Client", names.type_name),
            reader_type: reader.type_name.clone(),
            reader_module: reader.module.clone(),
            object_type: object.type_name.clone(),
            object_module: object.module.clone(),
            namespaced,
            children: Vec::new(),
        };

        Self {
            key,
            names,
            scope: spec.scope,
            client,
            reader,
            object,
            reference: None,
            references: Vec::new(),
        }
    }

    pub fn is_namespaced(&self) -> bool {
        self.scope.is_namespaced()
    }
}

impl Identified for ResourceNode {
    fn identity(&self) -> &ResourceKey {
        &self.key
    }
}

fn role_file(dir: &Path, kind: &str, suffix: &str) -> PathBuf {
    dir.join(naming::role_file_name(kind, suffix))
}

fn role_module(package: &str, stem: &str, suffix: &str) -> String {
    naming::join_package(&[package, &format!("{stem}_{suffix}")])
}

/// Accessor surface for one resource
#[derive(Debug, Clone, Serialize)]
pub struct ClientSubNode {
    pub file: PathBuf,
    pub module: String,
    pub type_name: String,
    pub reader_type: String,
    pub reader_module: String,
    pub object_type: String,
    pub object_module: String,
    pub namespaced: bool,
    /// Accessors for the resources this one owns
    pub children: Vec<ChildLink>,
}

/// Get/list surface for one resource
#[derive(Debug, Clone, Serialize)]
pub struct ReaderSubNode {
    pub file: PathBuf,
    pub module: String,
    pub type_name: String,
    pub object_type: String,
    pub object_module: String,
    pub namespaced: bool,
}

/// Generated type re-export plus kind/resource identity metadata
#[derive(Debug, Clone, Serialize)]
pub struct ObjectSubNode {
    pub file: PathBuf,
    pub module: String,
    pub type_name: String,
    /// Zero-sized type that carries the identity in generated code
    pub marker_type: String,
    pub identity: ResourceKey,
    pub list_kind: String,
    pub plural_name: String,
    pub namespaced: bool,
    /// Module path the upstream type is imported from
    pub source_package: String,
}

impl Identified for ObjectSubNode {
    fn identity(&self) -> &ResourceKey {
        &self.identity
    }
}

/// Back-link metadata: "this resource is linked from these owners"
///
/// Does not own the owners; each [`OwnerLink`] only copies the derived names
/// needed to generate a lookup from an owner object to its children.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceSubNode {
    pub file: PathBuf,
    pub module: String,
    pub object_type: String,
    pub object_module: String,
    pub plural_snake: String,
    pub namespaced: bool,
    /// One binding per owner, in the order the owners were linked
    pub owners: Vec<OwnerLink>,
}

impl ReferenceSubNode {
    pub fn new(layout_dir: &Path, package: &str, child: &ResourceNode) -> Self {
        Self {
            file: role_file(layout_dir, &child.names.kind, naming::REFERENCE_SUFFIX),
            module: role_module(package, &child.names.stem, naming::REFERENCE_SUFFIX),
            object_type: child.object.type_name.clone(),
            object_module: child.object.module.clone(),
            plural_snake: child.names.plural_snake.clone(),
            namespaced: child.is_namespaced(),
            owners: Vec::new(),
        }
    }
}

/// Name of the generated lookup function for an owner/child pair.
///
/// An owner from another group-version is qualified with that group-version's
/// alias, so same-kind owners from two group-versions get distinct lookups.
pub fn lookup_fn_name(child: &ResourceNode, owner: &ResourceNode) -> String {
    if child.key.group_version() == owner.key.group_version() {
        format!("{}_for_{}", child.names.plural_snake, owner.names.snake)
    } else {
        format!(
            "{}_for_{}_{}",
            child.names.plural_snake,
            naming::package_alias(&owner.key.group, &owner.key.version),
            owner.names.snake
        )
    }
}

/// Accessor on the owner's client; qualified like [`lookup_fn_name`].
fn child_accessor(child: &ResourceNode, owner: &ResourceNode) -> String {
    if child.key.group_version() == owner.key.group_version() {
        child.names.plural_snake.clone()
    } else {
        format!(
            "{}_{}",
            naming::package_alias(&child.key.group, &child.key.version),
            child.names.plural_snake
        )
    }
}

/// An owner bound to a child's reference node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerLink {
    pub key: ResourceKey,
    pub type_name: String,
    pub object_module: String,
    pub snake: String,
    pub namespaced: bool,
    /// Lookup function generated in the child's reference file
    pub lookup_fn: String,
}

impl OwnerLink {
    pub fn new(owner: &ResourceNode, child: &ResourceNode) -> Self {
        Self {
            key: owner.key.clone(),
            type_name: owner.object.type_name.clone(),
            object_module: owner.object.module.clone(),
            snake: owner.names.snake.clone(),
            namespaced: owner.is_namespaced(),
            lookup_fn: lookup_fn_name(child, owner),
        }
    }
}

impl Identified for OwnerLink {
    fn identity(&self) -> &ResourceKey {
        &self.key
    }
}

/// A child resource reachable from an owner's client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildLink {
    pub key: ResourceKey,
    pub type_name: String,
    pub object_module: String,
    pub reference_module: String,
    /// Accessor method name on the owner's client
    pub accessor: String,
    pub lookup_fn: String,
}

impl ChildLink {
    pub fn new(child: &ResourceNode, reference_module: &str, owner: &ResourceNode) -> Self {
        Self {
            key: child.key.clone(),
            type_name: child.object.type_name.clone(),
            object_module: child.object.module.clone(),
            reference_module: reference_module.to_string(),
            accessor: child_accessor(child, owner),
            lookup_fn: lookup_fn_name(child, owner),
        }
    }
}

impl Identified for ChildLink {
    fn identity(&self) -> &ResourceKey {
        &self.key
    }
}

/// A sub-resource reference that could not be resolved and was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedReference {
    /// Resource that declared the reference
    pub owner: ResourceKey,
    /// Identity that is not registered in the tree
    pub reference: ResourceKey,
    /// Position of the reference in the input
    pub location: String,
}
