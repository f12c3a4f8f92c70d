//! # Spec Module
//!
//! The input side of the generator: the [`ResourceSpec`] records that describe
//! which resources to generate code for, the document format they are loaded
//! from, and the field-level validation applied before a tree is built.
//!
//! ## Document format
//!
//! ```yaml
//! rootPath: src/generated
//! rootPackage: crate::generated
//! resources:
//!   - group: apps
//!     version: v1
//!     kind: Deployment
//!     pluralKind: Deployments
//!     subResources:
//!       - { group: apps, version: v1, kind: ReplicaSet }
//!   - group: apps
//!     version: v1
//!     kind: ReplicaSet
//!     pluralKind: ReplicaSets
//! ```
//!
//! YAML, JSON and TOML are accepted; the format is chosen by file extension.

mod load;
mod types;
mod validate;

pub use load::*;
pub use types::*;
pub use validate::*;
