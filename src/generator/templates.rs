use minijinja::{Environment, UndefinedBehavior, Value};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{GenError, Result};
use crate::naming;

/// Role a tree node plays in the generated output
///
/// Each role is bound to exactly one template, found by its conventional
/// file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateRole {
    /// Root client (`<root>/client.rs`)
    RootClient,
    /// Group-version client (`<root>/<group>/<version>/client.rs`)
    GroupVersionClient,
    /// Per-resource accessor surface
    Client,
    /// Per-resource get/list surface
    Reader,
    /// Per-resource type and identity metadata
    Object,
    /// Per-resource owner-to-child lookups
    Reference,
}

impl TemplateRole {
    pub const ALL: [TemplateRole; 6] = [
        TemplateRole::RootClient,
        TemplateRole::GroupVersionClient,
        TemplateRole::Client,
        TemplateRole::Reader,
        TemplateRole::Object,
        TemplateRole::Reference,
    ];

    /// Conventional template file name for this role.
    pub fn file_name(self) -> &'static str {
        match self {
            TemplateRole::RootClient => "root_client.rs.txt",
            TemplateRole::GroupVersionClient => "group_version_client.rs.txt",
            TemplateRole::Client => "client.rs.txt",
            TemplateRole::Reader => "reader.rs.txt",
            TemplateRole::Object => "object.rs.txt",
            TemplateRole::Reference => "reference.rs.txt",
        }
    }

    fn embedded_source(self) -> &'static str {
        match self {
            TemplateRole::RootClient => include_str!("../../templates/root_client.rs.txt"),
            TemplateRole::GroupVersionClient => {
                include_str!("../../templates/group_version_client.rs.txt")
            }
            TemplateRole::Client => include_str!("../../templates/client.rs.txt"),
            TemplateRole::Reader => include_str!("../../templates/reader.rs.txt"),
            TemplateRole::Object => include_str!("../../templates/object.rs.txt"),
            TemplateRole::Reference => include_str!("../../templates/reference.rs.txt"),
        }
    }
}

impl fmt::Display for TemplateRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Where a template set came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Templates compiled into the binary
    Embedded,
    /// Templates read from a directory at startup
    Directory(PathBuf),
}

/// One template source per [`TemplateRole`]
///
/// A set is always complete: constructors fail with
/// [`GenError::MissingTemplate`] rather than return a set with a gap, so a
/// missing template stops the run before any file is written.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    origin: TemplateSource,
    sources: BTreeMap<TemplateRole, String>,
}

impl TemplateSet {
    /// The templates shipped with the crate.
    pub fn embedded() -> Self {
        let sources = TemplateRole::ALL
            .iter()
            .map(|role| (*role, role.embedded_source().to_string()))
            .collect();
        Self {
            origin: TemplateSource::Embedded,
            sources,
        }
    }

    /// Load every role's template from `dir`.
    ///
    /// # Errors
    ///
    /// [`GenError::MissingTemplate`] for the first role whose file is absent,
    /// [`GenError::Io`] when a present file cannot be read.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut sources = BTreeMap::new();
        for role in TemplateRole::ALL {
            let path = dir.join(role.file_name());
            let source = std::fs::read_to_string(&path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    GenError::MissingTemplate {
                        template: role.file_name().to_string(),
                        source_dir: dir.to_path_buf(),
                    }
                } else {
                    GenError::io(&path, e)
                }
            })?;
            sources.insert(role, source);
        }
        Ok(Self {
            origin: TemplateSource::Directory(dir.to_path_buf()),
            sources,
        })
    }

    /// Replace the template bound to one role.
    pub fn with_template(mut self, role: TemplateRole, source: impl Into<String>) -> Self {
        self.sources.insert(role, source.into());
        self
    }

    pub fn origin(&self) -> &TemplateSource {
        &self.origin
    }

    pub fn source(&self, role: TemplateRole) -> Option<&str> {
        self.sources.get(&role).map(String::as_str)
    }

    /// Compile the set into a renderer.
    ///
    /// Syntax errors surface here, before anything is rendered.
    pub fn renderer(&self) -> Result<Renderer<'_>> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        register_filters(&mut env);

        for (role, source) in &self.sources {
            env.add_template(role.file_name(), source)
                .map_err(|source| GenError::Template {
                    template: role.file_name().to_string(),
                    path: self.template_path(*role),
                    source,
                })?;
        }
        Ok(Renderer { env })
    }

    fn template_path(&self, role: TemplateRole) -> PathBuf {
        match &self.origin {
            TemplateSource::Embedded => PathBuf::from(role.file_name()),
            TemplateSource::Directory(dir) => dir.join(role.file_name()),
        }
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::embedded()
    }
}

fn register_filters(env: &mut Environment<'_>) {
    env.add_filter("pascal", |s: String| naming::to_pascal_case(&s));
    env.add_filter("camel", |s: String| naming::to_camel_case(&s));
    env.add_filter("snake", |s: String| naming::to_snake_case(&s));
    env.add_filter("lower", |s: String| naming::to_lower(&s));
    env.add_filter("upper", |s: String| naming::to_upper(&s));
    env.add_filter("upper_first", |s: String| naming::upper_first(&s));
    env.add_filter("quote", |s: String| naming::quote(&s));
}

/// Compiled templates, ready to render node contexts
pub struct Renderer<'source> {
    env: Environment<'source>,
}

impl Renderer<'_> {
    /// Render the template bound to `role` against `context`.
    ///
    /// `destination` is only used to label errors.
    pub fn render(&self, role: TemplateRole, context: &Value, destination: &Path) -> Result<String> {
        let wrap = |source| GenError::Template {
            template: role.file_name().to_string(),
            path: destination.to_path_buf(),
            source,
        };
        let template = self.env.get_template(role.file_name()).map_err(wrap)?;
        template.render(context).map_err(wrap)
    }
}
