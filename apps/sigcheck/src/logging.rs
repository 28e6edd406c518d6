//! Tracing setup and structured logging of events

use sigcheck_events::{AppEvent, EventMessage, VerifyEvent};
use tracing::{error, info, trace, warn};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
fn default_filter(debug_enabled: bool) -> &'static str {
    if debug_enabled {
        "warn,sigcheck=debug,sigcheck_verify=debug,sigcheck_manifest=debug,sigcheck_config=debug"
    } else {
        "warn"
    }
}

/// Initialize tracing/logging on stderr
///
/// `RUST_LOG` wins over `--debug`; stdout stays reserved for the report.
pub fn init_tracing(debug_enabled: bool, json_logs: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug_enabled)));

    if json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(debug_enabled)
            .with_env_filter(filter)
            .init();
    }
}

/// Log an event using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let meta = &message.meta;
    match &message.event {
        AppEvent::Verify(verify_event) => match verify_event {
            VerifyEvent::Started {
                root,
                manifest,
                entries,
                concurrency,
            } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    root = %root,
                    manifest = %manifest,
                    entries,
                    concurrency,
                    "Verification started"
                );
            }
            VerifyEvent::FileVerified {
                path,
                status,
                detail,
            } => {
                if status.is_ok() {
                    trace!(
                        source = meta.source.as_str(),
                        correlation = ?meta.correlation_id,
                        path = %path,
                        "File verified"
                    );
                } else {
                    warn!(
                        source = meta.source.as_str(),
                        correlation = ?meta.correlation_id,
                        path = %path,
                        status = status.as_str(),
                        detail = ?detail,
                        "File failed verification"
                    );
                }
            }
            VerifyEvent::Completed {
                total,
                matched,
                failed,
                duration,
            } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    total,
                    matched,
                    failed,
                    duration = ?duration,
                    "Verification completed"
                );
            }
            VerifyEvent::TimedOut { attempted, total } => {
                warn!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    attempted,
                    total,
                    "Verification timed out"
                );
            }
            VerifyEvent::ManifestRejected { manifest, message } => {
                error!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    manifest = %manifest,
                    message = %message,
                    "Manifest rejected"
                );
            }
        },
    }
}
