/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`, set per-field defaults with
/// `#[serde(default = "...")]`, and call `Config::from_env()` at startup.
///
/// # Panics
///
/// Panics if a required env var is missing or cannot be deserialized;
/// a service with incomplete configuration must not come up.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Self {
        envy::from_env().expect("failed to load config from environment")
    }

    /// Like `from_env`, but only reads variables starting with `prefix`
    /// (e.g. `MEMBERSHIP_`), with the prefix stripped before matching
    /// field names.
    fn from_env_prefixed(prefix: &str) -> Self {
        envy::prefixed(prefix)
            .from_env()
            .expect("failed to load config from environment")
    }
}
