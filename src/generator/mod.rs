//! # Generator Module
//!
//! Walks an options tree and produces one source file per node.
//!
//! ## Pipeline
//!
//! ```text
//! RootNode → plan() → [PlannedWrite] → render → format → write
//! ```
//!
//! 1. **Plan** - [`plan`] walks the tree in a fixed pre-order and lists every
//!    destination with its template role and context. Pure, no I/O.
//! 2. **Render** - [`TemplateSet`] binds one template to each
//!    [`TemplateRole`]; contexts are rendered with `minijinja`, undefined
//!    variables being errors.
//! 3. **Format** - rendered text is piped through an external [`Formatter`]
//!    (`rustfmt` by default).
//! 4. **Write** - [`write_file`] creates missing directories and replaces the
//!    destination according to the [`WriteMode`].
//!
//! [`EmitStrategy`] decides whether each file is written as soon as it is
//! formatted (`Streaming`) or only after every file formatted (`Staged`).
//!
//! ## Generated Structure
//!
//! ```text
//! <root>/
//! ├── client.rs                       # root client, one accessor per group-version
//! └── apps/
//!     └── v1/
//!         ├── client.rs               # group-version client
//!         ├── deployment.rs           # object: type re-export + identity
//!         ├── deployment_client.rs
//!         ├── deployment_reader.rs
//!         └── replicaset_reference.rs # only for kinds owned by another kind
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kubegen::config::GeneratorConfig;
//! use kubegen::generator::generate_from_specs;
//!
//! let report = generate_from_specs(&GeneratorConfig::default(), &specs)?;
//! for path in &report.written {
//!     println!("{}", path.display());
//! }
//! ```

mod emit;
mod format;
mod plan;
mod templates;
mod writer;

#[cfg(test)]
mod tests;

pub use emit::{EmitStrategy, GenerationReport, Generator};
pub use format::Formatter;
pub use plan::{plan, PlannedWrite};
pub use templates::{Renderer, TemplateRole, TemplateSet, TemplateSource};
pub use writer::{temp_path, write_file, WriteMode};

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::spec::ResourceSpec;
use crate::tree::{build_tree, build_tree_strict, RootNode};

/// Build the options tree the way `config` asks for.
pub fn build_for(config: &GeneratorConfig, specs: &[ResourceSpec]) -> Result<RootNode> {
    if config.strict_references {
        build_tree_strict(&config.layout, specs)
    } else {
        build_tree(&config.layout, specs)
    }
}

/// Build the tree, load templates and emit every file.
///
/// Validation and template loading both happen before the first write, so an
/// invalid spec or a missing template leaves the output directory untouched.
pub fn generate_from_specs(
    config: &GeneratorConfig,
    specs: &[ResourceSpec],
) -> Result<GenerationReport> {
    let root = build_for(config, specs)?;
    config.generator()?.generate(&root)
}
