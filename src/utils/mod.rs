//! Cross-platform utilities and helpers
//!
//! # Modules
//!
//! - [`fs`] - Directory creation/removal, line-based file I/O, path resolution
//! - [`platform`] - Tool lookup, core count and CMake path separators

pub mod fs;
pub mod platform;

pub use fs::{actual_path, ensure_dir, normalize_path, read_lines, remove_dir_all, write_lines};
pub use platform::{available_cores, command_exists, to_forward_slashes, tool_command};
