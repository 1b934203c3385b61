//! File I/O operations for JSON documents.
//!
//! This module loads the document that queries run against, from a file,
//! an inline string or stdin, with optional gzip compression.

pub mod loader;
