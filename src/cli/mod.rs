//! # CLI Module
//!
//! Command-line front end for the generator.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Build the options tree from a spec document and write every file:
//!
//! ```bash
//! kubegen generate --spec resources.yaml --output src/generated
//! ```
//!
//! Options:
//! - `--spec <FILE>` - Spec document, YAML, JSON or TOML (required)
//! - `--output <DIR>` - Output directory, overrides `rootPath`
//! - `--package <PATH>` - Module path of the output root, overrides `rootPackage`
//! - `--templates <DIR>` - Template directory, overrides `KUBEGEN_TEMPLATES`
//! - `--formatter <PROG>` - Formatter executable, overrides `KUBEGEN_FORMATTER`
//! - `--dry-run` - Print the plan instead of writing
//! - `--atomic` - Replace files through a temporary file and rename
//! - `--staged` - Render and format everything before the first write
//! - `--strict-references` - Fail on sub-resources naming unknown resources
//!
//! ### `plan`
//!
//! Print `template<TAB>destination` for every file, in emission order:
//!
//! ```bash
//! kubegen plan --spec resources.yaml
//! ```
//!
//! ### `validate`
//!
//! Check the document and report dropped references:
//!
//! ```bash
//! kubegen validate --spec resources.yaml --strict
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use kubegen::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! run_cli(Cli::parse())?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, Cli, Commands};
