#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::config::GeneratorConfig;
use crate::error::GenError;
use crate::spec::{ResourceRef, ResourceSpec, Scope};
use crate::tree::Layout;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use walkdir::WalkDir;

fn config(out: &Path) -> GeneratorConfig {
    GeneratorConfig {
        layout: Layout::new(out, "crate::generated"),
        formatter: Formatter::new("cat", Vec::<String>::new()),
        ..GeneratorConfig::default()
    }
}

fn example_specs() -> Vec<ResourceSpec> {
    vec![
        ResourceSpec::new("core", "v1", "Pod", "Pods").with_scope(Scope::Namespaced),
        ResourceSpec::new("apps", "v1", "Deployment", "Deployments")
            .with_scope(Scope::Namespaced)
            .with_sub_resource(ResourceRef {
                plural_kind: Some("ReplicaSets".into()),
                ..ResourceRef::new("apps", "v1", "ReplicaSet")
            }),
        ResourceSpec::new("apps", "v1", "ReplicaSet", "ReplicaSets"),
    ]
}

/// Every file under `dir`, relative path to contents.
fn snapshot(dir: &Path) -> BTreeMap<PathBuf, String> {
    WalkDir::new(dir)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(dir).unwrap().to_path_buf();
            (rel, fs::read_to_string(e.path()).unwrap())
        })
        .collect()
}

fn file_count(dir: &Path) -> usize {
    if !dir.exists() {
        return 0;
    }
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .count()
}

#[test]
fn test_end_to_end_file_set() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("generated");
    let report = generate_from_specs(&config(&out), &example_specs()).unwrap();

    let files: Vec<_> = snapshot(&out).into_keys().collect();
    let expected: Vec<PathBuf> = [
        "apps/v1/client.rs",
        "apps/v1/deployment.rs",
        "apps/v1/deployment_client.rs",
        "apps/v1/deployment_reader.rs",
        "apps/v1/replicaset.rs",
        "apps/v1/replicaset_client.rs",
        "apps/v1/replicaset_reader.rs",
        "apps/v1/replicaset_reference.rs",
        "client.rs",
        "core/v1/client.rs",
        "core/v1/pod.rs",
        "core/v1/pod_client.rs",
        "core/v1/pod_reader.rs",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    assert_eq!(files, expected);
    assert_eq!(report.written.len(), 13);
    assert_eq!(report.written[0], out.join("client.rs"));
    assert!(report.dropped_references.is_empty());
}

#[test]
fn test_generated_contents() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("generated");
    generate_from_specs(&config(&out), &example_specs()).unwrap();
    let files = snapshot(&out);

    let root = &files[Path::new("client.rs")];
    assert!(root.starts_with("// Code generated by kubegen. DO NOT EDIT."));
    assert!(root.contains("pub struct Clientset"));
    assert!(root.contains("pub fn apps_v1(&self) -> crate::generated::apps::v1::client::AppsV1Client"));
    assert!(root.contains("pub fn core_v1(&self)"));
    assert!(root.contains("pub trait ResourceIdentity"));

    let gv = &files[Path::new("apps/v1/client.rs")];
    assert!(gv.contains("pub const GROUP: &str = \"apps\";"));
    assert!(gv.contains("pub fn replica_sets(&self)"));

    let object = &files[Path::new("apps/v1/replicaset.rs")];
    assert!(object.contains("pub use k8s_openapi::api::apps::v1::ReplicaSet;"));
    assert!(object.contains("impl crate::generated::client::ResourceIdentity for ReplicaSetKind"));
    assert!(object.contains("const LIST_KIND: &'static str = \"ReplicaSetList\";"));
    assert!(object.contains("const PLURAL: &'static str = \"replicasets\";"));
    assert!(object.contains("const NAMESPACED: bool = true;"));

    let reference = &files[Path::new("apps/v1/replicaset_reference.rs")];
    assert!(reference.contains("pub async fn replica_sets_for_deployment("));
    assert!(reference.contains("owner: &crate::generated::apps::v1::deployment::Deployment,"));

    let owner = &files[Path::new("apps/v1/deployment_client.rs")];
    assert!(owner.contains("pub async fn replica_sets("));
    assert!(owner.contains(
        "crate::generated::apps::v1::replicaset_reference::replica_sets_for_deployment(&self.client, owner)"
    ));

    let reader = &files[Path::new("core/v1/pod_reader.rs")];
    assert!(reader.contains("pub fn namespaced(client: Client, namespace: &str) -> Self"));
    assert!(!reader.contains("{{"));
}

#[test]
fn test_cluster_scoped_reader_has_no_namespaced_constructor() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("generated");
    let specs = [ResourceSpec::new("rbac.authorization.k8s.io", "v1", "ClusterRole", "ClusterRoles")
        .with_scope(Scope::Cluster)];
    generate_from_specs(&config(&out), &specs).unwrap();
    let files = snapshot(&out);

    let reader = &files[Path::new("rbac_authorization_k8s_io/v1/clusterrole_reader.rs")];
    assert!(!reader.contains("pub fn namespaced("));
    let object = &files[Path::new("rbac_authorization_k8s_io/v1/clusterrole.rs")];
    assert!(object.contains("const NAMESPACED: bool = false;"));
    let client = &files[Path::new("rbac_authorization_k8s_io/v1/clusterrole_client.rs")];
    assert!(client.contains("Reader for the cluster-scoped `ClusterRoles`."));
}

#[test]
fn test_object_scope_is_a_rust_bool_literal() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("generated");
    let specs = [
        ResourceSpec::new("core", "v1", "Namespace", "Namespaces").with_scope(Scope::Cluster),
        ResourceSpec::new("core", "v1", "Pod", "Pods"),
    ];
    generate_from_specs(&config(&out), &specs).unwrap();
    let files = snapshot(&out);

    let scope_line = |path: &str| {
        files[Path::new(path)]
            .lines()
            .find(|l| l.contains("const NAMESPACED"))
            .map(str::trim)
            .unwrap()
            .to_string()
    };
    assert_eq!(scope_line("core/v1/namespace.rs"), "const NAMESPACED: bool = false;");
    assert_eq!(scope_line("core/v1/pod.rs"), "const NAMESPACED: bool = true;");
}

#[test]
fn test_second_run_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("generated");
    let config = config(&out);

    generate_from_specs(&config, &example_specs()).unwrap();
    let first = snapshot(&out);
    generate_from_specs(&config, &example_specs()).unwrap();
    let second = snapshot(&out);
    assert_eq!(first, second);
}

#[test]
fn test_reordered_specs_generate_same_tree() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");

    let specs = example_specs();
    let reordered = vec![specs[2].clone(), specs[1].clone(), specs[0].clone()];
    generate_from_specs(&config(&a), &specs).unwrap();
    generate_from_specs(&config(&b), &reordered).unwrap();
    assert_eq!(snapshot(&a), snapshot(&b));
}

#[test]
fn test_invalid_spec_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("generated");
    let mut specs = example_specs();
    specs[0].kind = String::new();

    let err = generate_from_specs(&config(&out), &specs).unwrap_err();
    assert!(matches!(err, GenError::InvalidSpec { .. }));
    assert_eq!(file_count(&out), 0);
    assert!(!out.exists());
}

#[test]
fn test_strict_references_fail_before_writing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("generated");
    let config = GeneratorConfig {
        strict_references: true,
        ..config(&out)
    };
    let specs = example_specs();

    let err = generate_from_specs(&config, &specs[..2]).unwrap_err();
    assert!(matches!(err, GenError::UnresolvedReference { .. }));
    assert_eq!(file_count(&out), 0);
}

#[test]
fn test_dropped_reference_is_reported() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("generated");
    let specs = example_specs();
    let report = generate_from_specs(&config(&out), &specs[..2]).unwrap();

    assert_eq!(report.dropped_references.len(), 1);
    assert_eq!(report.dropped_references[0].reference.kind, "ReplicaSet");
    assert_eq!(report.written.len(), 9);
    assert!(!out.join("apps/v1/replicaset_reference.rs").exists());
}

#[test]
fn test_missing_template_directory_entry_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("generated");
    let templates = dir.path().join("templates");
    fs::create_dir_all(&templates).unwrap();
    for role in TemplateRole::ALL {
        if role != TemplateRole::Reference {
            fs::write(templates.join(role.file_name()), "// {{ 1 }}\n").unwrap();
        }
    }
    let config = GeneratorConfig {
        templates: Some(templates.clone()),
        ..config(&out)
    };

    let err = generate_from_specs(&config, &example_specs()).unwrap_err();
    match err {
        GenError::MissingTemplate {
            template,
            source_dir,
        } => {
            assert_eq!(template, "reference.rs.txt");
            assert_eq!(source_dir, templates);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(file_count(&out), 0);
}

#[test]
fn test_template_directory_replaces_embedded_templates() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("generated");
    let templates = dir.path().join("templates");
    fs::create_dir_all(&templates).unwrap();
    for role in TemplateRole::ALL {
        fs::write(templates.join(role.file_name()), format!("// {role}\n")).unwrap();
    }
    fs::write(
        templates.join(TemplateRole::Object.file_name()),
        "// {{ object.identity.kind|snake|upper }} in {{ group_version.alias }}\n",
    )
    .unwrap();
    let config = GeneratorConfig {
        templates: Some(templates),
        ..config(&out)
    };

    generate_from_specs(&config, &example_specs()).unwrap();
    let files = snapshot(&out);
    assert_eq!(files[Path::new("client.rs")], "// root_client.rs.txt\n");
    assert_eq!(files[Path::new("apps/v1/replicaset.rs")], "// REPLICA_SET in apps_v1\n");
}

fn failing_reader_templates() -> TemplateSet {
    TemplateSet::embedded().with_template(TemplateRole::Reader, "{{ reader.no_such_field }}\n")
}

#[test]
fn test_streaming_keeps_files_written_before_failure() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("generated");
    let root = build_tree(&Layout::new(&out, "crate::generated"), &example_specs()).unwrap();
    let generator = Generator::new(failing_reader_templates(), Formatter::new("cat", Vec::<String>::new()));

    let err = generator.generate(&root).unwrap_err();
    match err {
        GenError::Template { template, path, .. } => {
            assert_eq!(template, "reader.rs.txt");
            assert_eq!(path, out.join("apps/v1/deployment_reader.rs"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    // root client, apps/v1 client, deployment client
    assert_eq!(file_count(&out), 3);
    assert!(out.join("apps/v1/deployment_client.rs").exists());
}

#[test]
fn test_staged_failure_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("generated");
    let root = build_tree(&Layout::new(&out, "crate::generated"), &example_specs()).unwrap();
    let generator = Generator::new(failing_reader_templates(), Formatter::new("cat", Vec::<String>::new()))
        .with_strategy(EmitStrategy::Staged);

    assert!(matches!(
        generator.generate(&root).unwrap_err(),
        GenError::Template { .. }
    ));
    assert_eq!(file_count(&out), 0);
}

#[test]
fn test_template_syntax_error_fails_before_writing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("generated");
    let root = build_tree(&Layout::new(&out, "crate::generated"), &example_specs()).unwrap();
    let templates = TemplateSet::embedded().with_template(TemplateRole::Object, "{% if %}");
    let generator = Generator::new(templates, Formatter::new("cat", Vec::<String>::new()));

    assert!(matches!(
        generator.generate(&root).unwrap_err(),
        GenError::Template { .. }
    ));
    assert_eq!(file_count(&out), 0);
}

#[test]
fn test_formatter_failure_stops_generation() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("generated");
    let config = GeneratorConfig {
        formatter: Formatter::new("false", Vec::<String>::new()),
        ..config(&out)
    };

    let err = generate_from_specs(&config, &example_specs()).unwrap_err();
    match err {
        GenError::Format { program, path, .. } => {
            assert_eq!(program, "false");
            assert_eq!(path, out.join("client.rs"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(file_count(&out), 0);
}

#[test]
fn test_formatter_output_is_what_lands_on_disk() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("generated");
    let config = GeneratorConfig {
        formatter: Formatter::new("sh", ["-c", "cat >/dev/null; echo formatted"]),
        ..config(&out)
    };

    generate_from_specs(&config, &example_specs()).unwrap();
    assert!(snapshot(&out).values().all(|c| c == "formatted\n"));
}

#[test]
fn test_atomic_mode_replaces_existing_files() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("generated");
    fs::create_dir_all(out.join("core/v1")).unwrap();
    fs::write(out.join("core/v1/pod.rs"), "stale").unwrap();
    let config = GeneratorConfig {
        write_mode: WriteMode::Atomic,
        ..config(&out)
    };

    generate_from_specs(&config, &example_specs()).unwrap();
    let files = snapshot(&out);
    assert_eq!(files.len(), 13);
    assert!(files[Path::new("core/v1/pod.rs")].contains("pub use k8s_openapi::api::core::v1::Pod;"));
    assert!(files.keys().all(|p| !p.to_string_lossy().ends_with(".kubegen-tmp")));
}

#[test]
fn test_plan_alone_touches_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("generated");
    let root = build_tree(&Layout::new(&out, "crate::generated"), &example_specs()).unwrap();
    let writes = plan(&root);
    assert_eq!(writes.len(), 13);
    assert!(!out.exists());
}

#[test]
fn test_embedded_templates_format_with_rustfmt() {
    let available = Command::new("rustfmt")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    if !available {
        eprintln!("rustfmt not available; skipping");
        return;
    }

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("generated");
    let config = GeneratorConfig {
        formatter: Formatter::rustfmt(),
        ..config(&out)
    };
    let report = generate_from_specs(&config, &example_specs()).unwrap();
    assert_eq!(report.written.len(), 13);

    let first = snapshot(&out);
    assert!(first[Path::new("apps/v1/replicaset.rs")].contains("const NAMESPACED: bool = true;"));

    // formatting is a fixed point
    generate_from_specs(&config, &example_specs()).unwrap();
    assert_eq!(first, snapshot(&out));
}
