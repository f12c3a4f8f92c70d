use minijinja::Value;
use serde::Serialize;
use std::path::PathBuf;

use super::templates::TemplateRole;
use crate::naming;
use crate::spec::ResourceKey;
use crate::tree::{
    ClientSubNode, GroupVersionNode, Identified, ObjectSubNode, ReaderSubNode,
    ReferenceSubNode, ResourceNames, ResourceNode, RootNode,
};

/// One file the generator will produce
#[derive(Debug, Clone)]
pub struct PlannedWrite {
    pub role: TemplateRole,
    pub destination: PathBuf,
    /// Resource the file belongs to; `None` for the root and group-version clients
    pub identity: Option<ResourceKey>,
    /// Template context: the node plus the names its template needs
    pub context: Value,
}

impl PlannedWrite {
    /// Template file name bound to this write's role.
    pub fn template(&self) -> &'static str {
        self.role.file_name()
    }
}

#[derive(Serialize)]
struct RootSummary<'a> {
    package: &'a str,
    client_type: &'a str,
    location: &'a PathBuf,
}

/// What the root client needs to know about one group-version
#[derive(Serialize)]
struct GroupVersionSummary<'a> {
    group: &'a str,
    version: &'a str,
    package: &'a str,
    alias: &'a str,
    client_type: &'a str,
    client_module: String,
}

impl<'a> GroupVersionSummary<'a> {
    fn new(gv: &'a GroupVersionNode) -> Self {
        Self {
            group: &gv.group,
            version: &gv.version,
            package: &gv.package,
            alias: &gv.alias,
            client_type: &gv.client_type,
            client_module: client_module(&gv.package),
        }
    }
}

/// What a group-version client needs to know about one resource
#[derive(Serialize)]
struct ResourceSummary<'a> {
    kind: &'a str,
    type_name: &'a str,
    plural: &'a str,
    plural_snake: &'a str,
    client_type: &'a str,
    client_module: &'a str,
    namespaced: bool,
}

#[derive(Serialize)]
struct RootContext<'a> {
    root: RootSummary<'a>,
    group_versions: Vec<GroupVersionSummary<'a>>,
}

#[derive(Serialize)]
struct GroupVersionContext<'a> {
    root_package: &'a str,
    group_version: GroupVersionSummary<'a>,
    resources: Vec<ResourceSummary<'a>>,
}

/// The sub-node a per-resource template renders, under its role's name
#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum RoleNode<'a> {
    Client(&'a ClientSubNode),
    Reader(&'a ReaderSubNode),
    Object(&'a ObjectSubNode),
    Reference(&'a ReferenceSubNode),
}

#[derive(Serialize)]
struct ResourceContext<'a> {
    root_package: &'a str,
    group_version: GroupVersionSummary<'a>,
    resource: &'a ResourceNames,
    namespaced: bool,
    #[serde(flatten)]
    node: RoleNode<'a>,
}

fn client_module(package: &str) -> String {
    naming::join_package(&[package, naming::CLIENT_FILE.trim_end_matches(".rs")])
}

/// Walk the tree in its fixed pre-order and list every file to produce.
///
/// The root client comes first, then each group-version in key order: its
/// client, then each resource in kind order as client, reader, object and,
/// when present, reference. Nothing is rendered or written; the same tree
/// always yields the same plan.
pub fn plan(root: &RootNode) -> Vec<PlannedWrite> {
    let mut writes = Vec::with_capacity(1 + root.group_versions.len() + root.resource_count() * 4);

    writes.push(PlannedWrite {
        role: TemplateRole::RootClient,
        destination: root.file.clone(),
        identity: None,
        context: Value::from_serialize(RootContext {
            root: RootSummary {
                package: &root.package,
                client_type: &root.client_type,
                location: &root.location,
            },
            group_versions: root
                .group_versions
                .values()
                .map(GroupVersionSummary::new)
                .collect(),
        }),
    });

    for gv in root.group_versions.values() {
        writes.push(PlannedWrite {
            role: TemplateRole::GroupVersionClient,
            destination: gv.file.clone(),
            identity: None,
            context: Value::from_serialize(GroupVersionContext {
                root_package: &root.package,
                group_version: GroupVersionSummary::new(gv),
                resources: gv
                    .resources
                    .values()
                    .map(|r| ResourceSummary {
                        kind: &r.names.kind,
                        type_name: &r.names.type_name,
                        plural: &r.names.plural,
                        plural_snake: &r.names.plural_snake,
                        client_type: &r.client.type_name,
                        client_module: &r.client.module,
                        namespaced: r.is_namespaced(),
                    })
                    .collect(),
            }),
        });

        for resource in gv.resources.values() {
            plan_resource(&mut writes, &root.package, gv, resource);
        }
    }

    writes
}

fn plan_resource(
    writes: &mut Vec<PlannedWrite>,
    root_package: &str,
    gv: &GroupVersionNode,
    resource: &ResourceNode,
) {
    let mut push = |role, destination: &PathBuf, node| {
        writes.push(PlannedWrite {
            role,
            destination: destination.clone(),
            identity: Some(resource.identity().clone()),
            context: Value::from_serialize(ResourceContext {
                root_package,
                group_version: GroupVersionSummary::new(gv),
                resource: &resource.names,
                namespaced: resource.is_namespaced(),
                node,
            }),
        });
    };

    push(
        TemplateRole::Client,
        &resource.client.file,
        RoleNode::Client(&resource.client),
    );
    push(
        TemplateRole::Reader,
        &resource.reader.file,
        RoleNode::Reader(&resource.reader),
    );
    push(
        TemplateRole::Object,
        &resource.object.file,
        RoleNode::Object(&resource.object),
    );
    if let Some(reference) = &resource.reference {
        push(
            TemplateRole::Reference,
            &reference.file,
            RoleNode::Reference(reference),
        );
    }
}
