//! Outbound mail delivery configuration.

use serde::{Deserialize, Serialize};

/// Mailer configuration.
///
/// The `log` transport writes alerts to the application log instead of
/// sending them, which is the development default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailerConfig {
    /// Delivery transport: `"smtp"` or `"log"`.
    #[serde(default = "default_transport")]
    pub transport: String,
    /// SMTP relay host.
    #[serde(default = "default_host")]
    pub host: String,
    /// SMTP relay port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// SMTP username (empty = unauthenticated, e.g. a local Mailpit).
    #[serde(default)]
    pub username: String,
    /// SMTP password.
    #[serde(default)]
    pub password: String,
    /// Sender address.
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Whether to negotiate TLS with the relay.
    #[serde(default = "default_true")]
    pub use_tls: bool,
    /// Bound on a single send before the dispatcher gives up on it.
    #[serde(default = "default_send_timeout")]
    pub send_timeout_seconds: u64,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            host: default_host(),
            port: default_port(),
            username: String::new(),
            password: String::new(),
            from_address: default_from_address(),
            from_name: default_from_name(),
            use_tls: true,
            send_timeout_seconds: default_send_timeout(),
        }
    }
}

fn default_transport() -> String {
    "log".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    587
}

fn default_from_address() -> String {
    "noreply@miniblog.example".to_string()
}

fn default_from_name() -> String {
    "Miniblog".to_string()
}

fn default_true() -> bool {
    true
}

fn default_send_timeout() -> u64 {
    10
}
