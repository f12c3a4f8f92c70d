use std::collections::HashMap;

use tracing::{debug, warn};

use super::nodes::{
    ChildLink, DroppedReference, GroupVersionNode, Layout, OwnerLink, ReferenceSubNode,
    ResourceNode, RootNode,
};
use crate::error::{GenError, Result};
use crate::naming;
use crate::spec::{
    kinds, reference_location, resource_location, validate_specs, ResourceKey, ResourceSpec,
    ValidationIssue,
};

/// Build the options tree from an ordered list of resource specs.
///
/// Pass 1 registers a node per distinct `(group, version, kind)`; pass 2 links
/// each declared sub-resource to its owner. The build is pure: it logs but
/// never touches the filesystem.
///
/// # Errors
///
/// [`GenError::InvalidSpec`] with every issue found when a spec is missing a
/// required field, two specs disagree about the same identity, or two
/// resources would be generated into the same file.
pub fn build_tree(layout: &Layout, specs: &[ResourceSpec]) -> Result<RootNode> {
    let issues = validate_specs(specs);
    if !issues.is_empty() {
        return Err(GenError::InvalidSpec { issues });
    }

    let mut root = RootNode::new(layout);
    register(&mut root, layout, specs)?;
    link(&mut root, specs);

    debug!(
        group_versions = root.group_versions.len(),
        resources = root.resource_count(),
        dropped_references = root.dropped_references.len(),
        "options tree built"
    );
    Ok(root)
}

/// Like [`build_tree`], but an unresolved sub-resource reference is an error.
pub fn build_tree_strict(layout: &Layout, specs: &[ResourceSpec]) -> Result<RootNode> {
    let root = build_tree(layout, specs)?;
    match root.dropped_references.first() {
        Some(dropped) => Err(GenError::UnresolvedReference {
            owner: dropped.owner.clone(),
            reference: dropped.reference.clone(),
        }),
        None => Ok(root),
    }
}

fn register(root: &mut RootNode, layout: &Layout, specs: &[ResourceSpec]) -> Result<()> {
    let mut issues = Vec::new();
    let mut first_seen: HashMap<ResourceKey, usize> = HashMap::new();

    for (index, spec) in specs.iter().enumerate() {
        let key = spec.key();
        if let Some(&first) = first_seen.get(&key) {
            match conflict(&specs[first], spec) {
                Some(field) => issues.push(ValidationIssue::new(
                    resource_location(index),
                    kinds::IDENTITY_CONFLICT,
                    format!(
                        "{key} redeclared with a different {field} than {}",
                        resource_location(first)
                    ),
                )),
                None => debug!(resource = %key, index, first, "duplicate resource spec merged"),
            }
            continue;
        }

        let gv_key = key.group_version();
        if !root.group_versions.contains_key(&gv_key) {
            let candidate = GroupVersionNode::new(layout, &spec.group, &spec.version);
            // distinct groups can normalize to the same directory
            if let Some(existing) = root
                .group_versions
                .values()
                .find(|gv| gv.location == candidate.location)
            {
                issues.push(ValidationIssue::new(
                    resource_location(index),
                    kinds::PATH_COLLISION,
                    format!(
                        "group-version '{}/{}' and '{}/{}' both generate {}",
                        spec.group,
                        spec.version,
                        existing.group,
                        existing.version,
                        candidate.location.display()
                    ),
                ));
                continue;
            }
            root.group_versions.insert(gv_key.clone(), candidate);
        }
        let Some(gv) = root.group_versions.get_mut(&gv_key) else {
            continue;
        };

        let stem = naming::resource_stem(&spec.kind);
        if naming::object_file_name(&spec.kind) == naming::CLIENT_FILE {
            issues.push(ValidationIssue::new(
                resource_location(index),
                kinds::PATH_COLLISION,
                format!(
                    "kind '{}' would overwrite the group-version {}",
                    spec.kind,
                    naming::CLIENT_FILE
                ),
            ));
            continue;
        }
        if let Some(existing) = gv.resources.values().find(|r| r.names.stem == stem) {
            issues.push(ValidationIssue::new(
                resource_location(index),
                kinds::PATH_COLLISION,
                format!(
                    "kind '{}' and kind '{}' both generate {}",
                    spec.kind,
                    existing.names.kind,
                    gv.location.join(naming::object_file_name(&spec.kind)).display()
                ),
            ));
            continue;
        }

        let node = ResourceNode::new(layout, gv, spec);
        debug!(resource = %key, file = %node.object.file.display(), "registered resource");
        gv.resources.insert(spec.kind.clone(), node);
        first_seen.insert(key, index);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(GenError::InvalidSpec { issues })
    }
}

/// Name of the first non-identity field on which two specs disagree.
fn conflict(first: &ResourceSpec, other: &ResourceSpec) -> Option<&'static str> {
    fn package(spec: &ResourceSpec) -> Option<&str> {
        spec.package_override
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    if !first.plural_kind.eq_ignore_ascii_case(&other.plural_kind) {
        Some("pluralKind")
    } else if first.effective_list_kind() != other.effective_list_kind() {
        Some("listKind")
    } else if first.scope != other.scope {
        Some("scope")
    } else if package(first) != package(other) {
        Some("package")
    } else {
        None
    }
}

fn link(root: &mut RootNode, specs: &[ResourceSpec]) {
    for (index, spec) in specs.iter().enumerate() {
        let owner_key = spec.key();
        for (sub_index, reference) in spec.sub_resources.iter().enumerate() {
            let child_key = reference.key();
            if root.resource(&child_key).is_none() {
                let location = reference_location(index, sub_index);
                warn!(
                    owner = %owner_key,
                    reference = %child_key,
                    location = %location,
                    "sub-resource is not a registered resource; reference dropped"
                );
                root.dropped_references.push(DroppedReference {
                    owner: owner_key.clone(),
                    reference: child_key,
                    location,
                });
                continue;
            }
            bind(root, &owner_key, &child_key);
        }
    }
}

fn bind(root: &mut RootNode, owner_key: &ResourceKey, child_key: &ResourceKey) {
    let (owner_link, child_link, reference) = {
        let (Some(owner), Some(child)) = (root.resource(owner_key), root.resource(child_key))
        else {
            return;
        };
        if owner.references.contains(child_key) {
            return;
        }
        let Some(gv) = root.group_version(&child_key.group, &child_key.version) else {
            return;
        };
        let reference = match &child.reference {
            Some(_) => None,
            None => Some(ReferenceSubNode::new(&gv.location, &gv.package, child)),
        };
        let reference_module = reference
            .as_ref()
            .or(child.reference.as_ref())
            .map(|r| r.module.clone())
            .unwrap_or_default();
        (
            OwnerLink::new(owner, child),
            ChildLink::new(child, &reference_module, owner),
            reference,
        )
    };

    if let Some(child) = root.resource_mut(child_key) {
        if let Some(reference) = reference {
            child.reference = Some(reference);
        }
        if let Some(reference) = child.reference.as_mut() {
            reference.owners.push(owner_link);
        }
    }
    if let Some(owner) = root.resource_mut(owner_key) {
        owner.references.push(child_key.clone());
        owner.client.children.push(child_link);
    }
    debug!(owner = %owner_key, child = %child_key, "linked sub-resource");
}
