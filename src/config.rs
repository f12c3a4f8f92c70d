//! # Generator Configuration
//!
//! Resolves the settings of one generator run from four layers, highest
//! precedence first:
//!
//! 1. Command-line flags ([`Overrides`])
//! 2. Environment variables
//! 3. The settings block of the spec document
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! ### `KUBEGEN_FORMATTER`
//!
//! Formatter executable. When the document has a `formatter` block its
//! arguments are kept, so `KUBEGEN_FORMATTER=/opt/rust/bin/rustfmt` swaps the
//! binary without changing how it is called. Without one the program runs
//! with no arguments; `cat` skips formatting.
//!
//! ### `KUBEGEN_TEMPLATES`
//!
//! Directory holding one template per role. Unset means the templates
//! embedded in the binary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kubegen::config::{GeneratorConfig, Overrides};
//! use kubegen::spec::load_document;
//!
//! let document = load_document("resources.yaml".as_ref())?;
//! let config = GeneratorConfig::resolve(&document.settings, &Overrides::default());
//! let generator = config.generator()?;
//! ```

use std::env;
use std::path::PathBuf;

use crate::error::Result;
use crate::generator::{EmitStrategy, Formatter, Generator, TemplateSet, WriteMode};
use crate::spec::DocumentSettings;
use crate::tree::Layout;

pub const FORMATTER_ENV: &str = "KUBEGEN_FORMATTER";
pub const TEMPLATES_ENV: &str = "KUBEGEN_TEMPLATES";

/// Settings supplied on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub root_path: Option<PathBuf>,
    pub root_package: Option<String>,
    pub templates: Option<PathBuf>,
    pub formatter: Option<String>,
    pub write_mode: Option<WriteMode>,
    pub strategy: Option<EmitStrategy>,
    pub strict_references: bool,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub layout: Layout,
    /// `None` selects the embedded templates
    pub templates: Option<PathBuf>,
    pub formatter: Formatter,
    pub write_mode: WriteMode,
    pub strategy: EmitStrategy,
    /// Treat an unresolved sub-resource reference as an error
    pub strict_references: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            templates: None,
            formatter: Formatter::default(),
            write_mode: WriteMode::default(),
            strategy: EmitStrategy::default(),
            strict_references: false,
        }
    }
}

impl GeneratorConfig {
    /// Resolve against the process environment.
    pub fn resolve(document: &DocumentSettings, overrides: &Overrides) -> Self {
        Self::resolve_with(document, overrides, |name| env::var(name).ok())
    }

    /// Resolve with an explicit environment lookup.
    ///
    /// Empty environment values count as unset.
    pub fn resolve_with<F>(document: &DocumentSettings, overrides: &Overrides, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        let mut layout = Layout::new(
            overrides
                .root_path
                .clone()
                .or_else(|| document.root_path.clone())
                .unwrap_or_else(|| PathBuf::from(Layout::DEFAULT_ROOT_PATH)),
            overrides
                .root_package
                .clone()
                .or_else(|| document.root_package.clone())
                .unwrap_or_else(|| Layout::DEFAULT_ROOT_PACKAGE.to_string()),
        );
        if let Some(ecosystem_root) = &document.ecosystem_root {
            layout = layout.with_ecosystem_root(ecosystem_root.clone());
        }

        let templates = overrides
            .templates
            .clone()
            .or_else(|| var(TEMPLATES_ENV).map(PathBuf::from))
            .or_else(|| document.templates.clone());

        let program = overrides.formatter.clone().or_else(|| var(FORMATTER_ENV));
        let formatter = match (&document.formatter, program) {
            (Some(settings), Some(program)) => Formatter::from(settings).with_program(program),
            (Some(settings), None) => Formatter::from(settings),
            // the default arguments belong to rustfmt and are not carried over
            (None, Some(program)) => Formatter::new(program, Vec::<String>::new()),
            (None, None) => Formatter::default(),
        };

        Self {
            layout,
            templates,
            formatter,
            write_mode: overrides.write_mode.unwrap_or_default(),
            strategy: overrides.strategy.unwrap_or_default(),
            strict_references: overrides.strict_references,
        }
    }

    /// Load the configured template set.
    ///
    /// # Errors
    ///
    /// [`GenError::MissingTemplate`](crate::GenError::MissingTemplate) when a
    /// template directory is configured but lacks a role's file.
    pub fn template_set(&self) -> Result<TemplateSet> {
        match &self.templates {
            Some(dir) => TemplateSet::load(dir),
            None => Ok(TemplateSet::embedded()),
        }
    }

    /// A generator wired with these settings.
    pub fn generator(&self) -> Result<Generator> {
        Ok(Generator::new(self.template_set()?, self.formatter.clone())
            .with_write_mode(self.write_mode)
            .with_strategy(self.strategy))
    }
}
