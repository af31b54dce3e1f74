//! Process-wide tracing/logging setup.

pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize tracing/logging from the environment.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}
