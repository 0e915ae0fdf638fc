//! Deployment-environment detection.
//!
//! The running environment is read from the `ENV` variable and compared
//! case-insensitively.

use std::env;

const ENVIRONMENT_VARIABLE: &str = "ENV";

/// Name of the current environment, lowercased, when `ENV` is set.
pub fn environment() -> Option<String> {
    env::var(ENVIRONMENT_VARIABLE)
        .ok()
        .map(|value| value.to_lowercase())
}

/// Check whether running in a development environment.
pub fn is_development() -> bool {
    matches!(environment().as_deref(), Some("dev") | Some("development"))
}

/// Check whether running in a production environment.
pub fn is_production() -> bool {
    matches!(environment().as_deref(), Some("prod") | Some("production"))
}

/// Check whether running in a staging environment.
pub fn is_staging() -> bool {
    matches!(environment().as_deref(), Some("staging"))
}

/// Check whether running in a test environment.
pub fn is_test() -> bool {
    matches!(environment().as_deref(), Some("test"))
}
