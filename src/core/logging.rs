//! Logging initialization and utilities

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// # Example
/// ```
/// armature::core::logging::init();
/// log::info!("Animation runtime started");
/// ```
pub fn init() {
    if env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Initialize logging for unit tests. Safe to call from every test.
pub fn init_for_tests() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("debug")
    )
    .is_test(true)
    .try_init();
}
