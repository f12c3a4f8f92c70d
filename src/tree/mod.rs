//! # Options Tree
//!
//! The in-memory intermediate representation the generator walks. A flat list
//! of [`ResourceSpec`](crate::spec::ResourceSpec)s becomes:
//!
//! ```text
//! RootNode                                  <root>/client.rs
//! └── GroupVersionNode  (apps/v1)           <root>/apps/v1/client.rs
//!     └── ResourceNode  (Deployment)
//!         ├── ClientSubNode                 <root>/apps/v1/deployment_client.rs
//!         ├── ReaderSubNode                 <root>/apps/v1/deployment_reader.rs
//!         ├── ObjectSubNode                 <root>/apps/v1/deployment.rs
//!         └── ReferenceSubNode (optional)   <root>/apps/v1/deployment_reference.rs
//! ```
//!
//! ## Building
//!
//! [`build_tree`] runs two passes over the specs:
//!
//! 1. **Registration** - one [`ResourceNode`] per `(group, version, kind)`.
//!    The first spec for an identity wins; a later duplicate is merged when it
//!    agrees (plural compared case-insensitively) and rejected otherwise.
//! 2. **Linking** - every `subResources` entry is looked up among the
//!    registered nodes. A hit gives the child a [`ReferenceSubNode`] (created
//!    on the first owner) with one [`OwnerLink`] per owner, and adds a
//!    [`ChildLink`] to the owner's client. A miss is logged at `warn`, recorded
//!    in [`RootNode::dropped_references`] and otherwise ignored.
//!
//! The tree lives only for one generator run and is never persisted.
//! Children are kept in `BTreeMap`s so the visiting order depends only on the
//! identities, never on input order.

mod build;
mod nodes;

pub use build::{build_tree, build_tree_strict};
pub use nodes::*;
