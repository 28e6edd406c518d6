#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Filesystem abstraction for sigcheck.
//!
//! Verification only ever reads. Everything the verifier touches goes through
//! the [`FileSource`] trait so that the worker pool can run against the local
//! disk ([`LocalFs`]) or, with the `test-support` feature, an in-memory tree
//! (`MemoryFs`).

pub mod filesystem;

#[cfg(any(test, feature = "test-support"))]
pub use filesystem::memory::MemoryFs;
pub use filesystem::{BoxedReader, FileSource, LocalFs};
