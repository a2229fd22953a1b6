//! Rendering and writing of output targets.

pub mod format;
pub mod sourcemap;
pub mod writer;

pub use format::{Wrapped, wrap};
pub use sourcemap::LineMap;
pub use writer::{validate_output_path, write_files_atomic};
