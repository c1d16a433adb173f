//! Unit test module
//!
//! Pipeline unit tests live here, separate from source files.
