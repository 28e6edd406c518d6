#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Parallel verification of directory trees against checksum manifests
//!
//! [`Verifier`] loads `<root>/<manifest>`, checks every listed file on a
//! bounded pool of tokio tasks and aggregates one outcome per entry into a
//! [`VerificationReport`]. A run never stops at the first failure.
//!
//! ```no_run
//! # async fn demo() -> Result<(), sigcheck_errors::Error> {
//! sigcheck_verify::check("/srv/release").await?;
//! # Ok(())
//! # }
//! ```

mod emit;
pub mod pool;
pub mod report;
pub mod verifier;

pub use pool::{verify_all, verify_item, PoolRun, VerifyOptions, VerifyPool, WorkItem};
pub use report::{EntryResult, OutcomeCounts, VerificationOutcome, VerificationReport};
pub use verifier::{check, Verifier, VerifierBuilder};
