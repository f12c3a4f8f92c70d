//! # kubegen
//!
//! **kubegen** turns a list of Kubernetes resource descriptions into a tree of
//! typed client source files: one root client, one client per API
//! group-version, and per resource a client, a reader, an object module and,
//! for resources owned by another resource, a reference module.
//!
//! ## Architecture
//!
//! - **[`naming`]** - Pure derivation of type names, file names, module paths and directories
//! - **[`spec`]** - Input model, spec-document loading (YAML/JSON/TOML) and validation
//! - **[`tree`]** - Two-pass options-tree builder: registration, then sub-resource linking
//! - **[`generator`]** - Planning, template rendering, external formatting and file writing
//! - **[`config`]** - Settings resolution: flags, environment, document, defaults
//! - **[`logging`]** - `tracing` subscriber bootstrap
//! - **[`cli`]** - The `kubegen` command line
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant CLI as CLI<br/>(kubegen)
//!     participant Load as spec::load_document
//!     participant Tree as tree::build_tree
//!     participant Plan as generator::plan
//!     participant Gen as generator::Generator
//!     participant Fmt as Formatter<br/>(rustfmt)
//!     participant FS as File System
//!
//!     User->>CLI: kubegen generate --spec resources.yaml
//!     CLI->>Load: load_document(path)
//!     Load-->>CLI: SpecDocument (settings + resources)
//!     CLI->>Tree: build_tree(&layout, &resources)
//!     Tree->>Tree: validate, register, link
//!     alt Invalid specs
//!         Tree-->>CLI: InvalidSpec (nothing written)
//!     end
//!     Tree-->>CLI: RootNode
//!     CLI->>Gen: generate(&root)
//!     Gen->>Plan: plan(&root)
//!     Plan-->>Gen: [PlannedWrite] in pre-order
//!     loop every planned write
//!         Gen->>Gen: render template
//!         Gen->>Fmt: pipe rendered text
//!         Fmt-->>Gen: formatted text
//!         Gen->>FS: create dirs, replace file
//!     end
//!     Gen-->>CLI: GenerationReport
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use kubegen::config::GeneratorConfig;
//! use kubegen::generator::generate_from_specs;
//! use kubegen::spec::{ResourceRef, ResourceSpec};
//!
//! let specs = vec![
//!     ResourceSpec::new("apps", "v1", "Deployment", "Deployments")
//!         .with_sub_resource(ResourceRef::new("apps", "v1", "ReplicaSet")),
//!     ResourceSpec::new("apps", "v1", "ReplicaSet", "ReplicaSets"),
//! ];
//! let report = generate_from_specs(&GeneratorConfig::default(), &specs)?;
//! assert_eq!(report.written.len(), 9);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod naming;
pub mod spec;
pub mod tree;

pub use error::{GenError, Result};
pub use generator::{generate_from_specs, GenerationReport, Generator};
pub use spec::{ResourceKey, ResourceRef, ResourceSpec, Scope};
pub use tree::{build_tree, Layout, RootNode};
