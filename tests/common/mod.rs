#![allow(dead_code)]

pub mod temp_files {
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Writes `content` as `resources.<ext>` inside a fresh temporary directory.
    ///
    /// The directory is removed when the returned guard drops.
    pub fn create_temp_spec(content: &str, ext: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(format!("resources.{ext}"));
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    /// Writes an executable shell script, for use as a stub formatter.
    pub fn create_stub_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        path
    }
}

pub mod tree {
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::{Path, PathBuf};
    use walkdir::WalkDir;

    /// Every file under `dir`, as relative path to contents.
    pub fn snapshot(dir: &Path) -> BTreeMap<PathBuf, String> {
        if !dir.exists() {
            return BTreeMap::new();
        }
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
}

/// The workload example used across the integration tests, as YAML.
pub const WORKLOADS_YAML: &str = r#"
resources:
  - group: core
    version: v1
    kind: Pod
    pluralKind: Pods
    scope: Namespaced
  - group: apps
    version: v1
    kind: Deployment
    pluralKind: Deployments
    scope: Namespaced
    subResources:
      - group: apps
        version: v1
        kind: ReplicaSet
        pluralKind: ReplicaSets
  - group: apps
    version: v1
    kind: ReplicaSet
    pluralKind: ReplicaSets
"#;
