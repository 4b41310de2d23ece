/// Application-level constants
pub const APP_NAME: &str = "Loanwise";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed deployment endpoint of the decisioning service.
///
/// OCR extraction, loan scoring and suggestion generation all live behind
/// this origin. There is no runtime override: the binary always talks to the
/// deployment it was built for.
pub const SERVICE_ENDPOINT: &str = "http://localhost:5000";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "warn,loanwise_lib=info"
}

/// Log filter used with `--verbose`.
pub fn verbose_log_filter() -> &'static str {
    "info,loanwise_lib=debug"
}
