//! # DruDock Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! Filesystem helpers shared by the templating layer and the database commands.
//! Import from the submodule, e.g. `use crate::common::fs::io::write_string_to_file;`.

/// Basic file I/O (`ensure_dir_exists`, `write_string_to_file`).
pub mod io;
