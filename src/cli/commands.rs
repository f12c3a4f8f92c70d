use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::{GeneratorConfig, Overrides};
use crate::error::GenError;
use crate::generator::{build_for, plan, EmitStrategy, WriteMode};
use crate::spec::{load_document, print_issues, SpecDocument};
use crate::tree::RootNode;

/// Command-line interface for kubegen
///
/// Turns a resource spec document into a tree of typed client source files.
#[derive(Parser, Debug)]
#[command(name = "kubegen")]
#[command(about = "Generate typed Kubernetes client code from resource specs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available kubegen commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate client sources from a resource spec document
    Generate {
        /// Spec document (YAML, JSON or TOML)
        #[arg(short, long)]
        spec: PathBuf,

        /// Output directory (overrides the document's rootPath)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Module path of the output root (overrides rootPackage)
        #[arg(short, long)]
        package: Option<String>,

        /// Template directory (overrides KUBEGEN_TEMPLATES and the document)
        #[arg(long)]
        templates: Option<PathBuf>,

        /// Formatter executable (overrides KUBEGEN_FORMATTER and the document)
        #[arg(long)]
        formatter: Option<String>,

        /// Print what would be generated without writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Write through a temporary file and rename it into place
        #[arg(long, default_value_t = false)]
        atomic: bool,

        /// Render and format everything before writing anything
        #[arg(long, default_value_t = false)]
        staged: bool,

        /// Fail when a sub-resource names an unregistered resource
        #[arg(long, default_value_t = false)]
        strict_references: bool,
    },
    /// List the files a generate run would produce
    Plan {
        /// Spec document (YAML, JSON or TOML)
        #[arg(short, long)]
        spec: PathBuf,

        /// Output directory (overrides the document's rootPath)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Module path of the output root (overrides rootPackage)
        #[arg(short, long)]
        package: Option<String>,
    },
    /// Check a spec document without generating anything
    Validate {
        /// Spec document (YAML, JSON or TOML)
        #[arg(short, long)]
        spec: PathBuf,

        /// Treat dropped sub-resource references as errors
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
}

impl Commands {
    /// Command-line settings layered over the environment and the document.
    pub fn overrides(&self) -> Overrides {
        match self {
            Commands::Generate {
                output,
                package,
                templates,
                formatter,
                atomic,
                staged,
                strict_references,
                ..
            } => Overrides {
                root_path: output.clone(),
                root_package: package.clone(),
                templates: templates.clone(),
                formatter: formatter.clone(),
                write_mode: atomic.then_some(WriteMode::Atomic),
                strategy: staged.then_some(EmitStrategy::Staged),
                strict_references: *strict_references,
            },
            Commands::Plan {
                output, package, ..
            } => Overrides {
                root_path: output.clone(),
                root_package: package.clone(),
                ..Overrides::default()
            },
            // validate reports dropped references itself
            Commands::Validate { .. } => Overrides::default(),
        }
    }

    pub fn spec(&self) -> &Path {
        match self {
            Commands::Generate { spec, .. }
            | Commands::Plan { spec, .. }
            | Commands::Validate { spec, .. } => spec,
        }
    }
}

/// Execute a parsed command line.
///
/// # Errors
///
/// Returns an error if:
/// - The spec document cannot be read or parsed
/// - The specs fail validation (issues are printed to stderr first)
/// - A template is missing or fails to render
/// - The formatter rejects a file or a write fails
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let command = &cli.command;
    let document = load_document(command.spec())?;
    let config = GeneratorConfig::resolve(&document.settings, &command.overrides());

    match command {
        Commands::Generate { dry_run: true, .. } | Commands::Plan { .. } => {
            let root = build(&config, &document)?;
            // surface template problems before claiming the plan is good
            config.template_set()?.renderer()?;
            for write in plan(&root) {
                println!("{}\t{}", write.template(), write.destination.display());
            }
            Ok(())
        }
        Commands::Generate { .. } => {
            let root = build(&config, &document)?;
            let report = config
                .generator()?
                .generate(&root)
                .with_context(|| format!("generation into {} failed", root.location.display()))?;
            for dropped in &report.dropped_references {
                eprintln!(
                    "⚠️  {}: {} references unknown resource {}",
                    dropped.location, dropped.owner, dropped.reference
                );
            }
            println!(
                "✅ Generated {} file(s) under {}",
                report.written.len(),
                root.location.display()
            );
            Ok(())
        }
        Commands::Validate { strict, .. } => {
            let root = build(&config, &document)?;
            for dropped in &root.dropped_references {
                eprintln!(
                    "⚠️  {}: {} references unknown resource {}",
                    dropped.location, dropped.owner, dropped.reference
                );
            }
            if *strict && !root.dropped_references.is_empty() {
                bail!(
                    "{} unresolved sub-resource reference(s)",
                    root.dropped_references.len()
                );
            }
            println!(
                "✅ {} resource(s) in {} group-version(s) are valid",
                root.resource_count(),
                root.group_versions.len()
            );
            Ok(())
        }
    }
}

fn build(config: &GeneratorConfig, document: &SpecDocument) -> anyhow::Result<RootNode> {
    match build_for(config, &document.resources) {
        Ok(root) => {
            info!(
                resources = root.resource_count(),
                group_versions = root.group_versions.len(),
                "resource specs loaded"
            );
            Ok(root)
        }
        Err(GenError::InvalidSpec { issues }) => {
            print_issues(&issues);
            bail!("{} validation issue(s) in resource specs", issues.len())
        }
        Err(err) => {
            warn!(error = %err, "failed to build options tree");
            Err(err.into())
        }
    }
}
