//! Unit tests for logging setup

use alpha_signals::logging::{init_logging, LogFormat, LoggingError};
use std::path::Path;

#[test]
fn test_format_follows_environment() {
    assert_eq!(LogFormat::for_environment("production"), LogFormat::Json);
    assert_eq!(LogFormat::for_environment("prod"), LogFormat::Json);
    assert_eq!(LogFormat::for_environment("development"), LogFormat::Pretty);
    assert_eq!(LogFormat::for_environment("staging"), LogFormat::Pretty);
}

#[test]
fn test_unwritable_log_file_is_reported() {
    let path = Path::new("/nonexistent/alpha-signals/worker.log");
    match init_logging(path, "production") {
        Err(LoggingError::File { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("unexpected result: {other:?}"),
    }
}
