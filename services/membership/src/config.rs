use serde::Deserialize;

use registry_core::config::Config;

/// Membership service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct MembershipConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3114). Env var: `MEMBERSHIP_PORT`.
    #[serde(default = "default_port")]
    pub membership_port: u16,
    /// Directory for stored payment-proof documents. Env var: `DOCUMENT_DIR`.
    #[serde(default = "default_document_dir")]
    pub document_dir: String,
    /// Outbound notification webhook. Unset means notifications are logged
    /// and dropped. Env var: `NOTIFY_WEBHOOK_URL`.
    #[serde(default)]
    pub notify_webhook_url: Option<String>,
    /// Echo OTP codes in issue responses. Never enable outside local
    /// development. Env var: `OTP_DEBUG_ECHO`.
    #[serde(default)]
    pub otp_debug_echo: bool,
}

impl Config for MembershipConfig {}

fn default_port() -> u16 {
    3114
}

fn default_document_dir() -> String {
    "/var/lib/membership/documents".to_owned()
}
