//! Environment variables read by [`crate::Config::merge_env`]

pub const ENV_MANIFEST: &str = "SIGCHECK_MANIFEST";
pub const ENV_CONCURRENCY: &str = "SIGCHECK_CONCURRENCY";
pub const ENV_CHUNK_SIZE: &str = "SIGCHECK_CHUNK_SIZE";
pub const ENV_ALGORITHM: &str = "SIGCHECK_ALGORITHM";
pub const ENV_TIMEOUT: &str = "SIGCHECK_TIMEOUT";
