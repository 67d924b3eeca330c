//! Repository discovery and initialization for got.
//!
//! A repository is a working directory with a hidden `.got/` storage subtree:
//!
//! ```text
//! <root>/.got/
//!   description
//!   HEAD
//!   config
//!   branches/
//!   refs/heads/
//!   refs/tags/
//!   objects/
//! ```
//!
//! The subtree is staged in a temporary directory and renamed into place, so
//! a repository is either fully initialized or absent. Every marker file is
//! written through [`write_atomic`].
//!
//! # Modules
//!
//! - [`error`] -- [`RepoError`] and the [`RepoResult`] alias
//! - [`config`] -- the TOML `config` metadata file
//! - [`atomic`] -- write-to-temp-then-rename helper shared with the object store
//! - [`repository`] -- [`Repository`] handle: `init`, `load`, `find`, `path_to`

pub mod atomic;
pub mod config;
pub mod error;
pub mod repository;

pub use atomic::write_atomic;
pub use config::{CoreConfig, RepoConfig};
pub use error::{RepoError, RepoResult};
pub use repository::{InitOptions, Repository, DEFAULT_BRANCH, GOT_DIR};
