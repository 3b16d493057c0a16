//! Environment variable helpers

/// Read an environment variable, treating unset and whitespace-only values as absent.
pub fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
