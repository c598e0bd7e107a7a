//! Model tree selection
//!
//! Walks a model directory and decides exactly which regular files take part
//! in its manifest, and under which root-relative names.

pub mod ignore;
pub mod path;
pub mod walker;

pub use ignore::IgnoreSet;
pub use path::RelPath;
pub use walker::{select_files, Selection, Visit, Walker};
