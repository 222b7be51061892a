//! Shared utility functions.
//!
//! - UTF-8 safe truncation and kebab-casing
//! - File operations (.gitignore loading, guarded writes)

mod file_ops;
mod string;

pub use file_ops::{load_gitignore, write_file};
pub use string::{to_kebab_case, truncate_chars};
