// Filesystem Interfaces
//
// This module defines interfaces for file system operations.
// These interfaces enable testing with mock implementations and allow for different
// filesystem backends (local, cloud, etc.).

pub mod file_operations;

// Re-export all filesystem traits
pub use file_operations::{FileOperations, FileMetadata};
