//! Configuration for srcon sessions
//!
//! Centralized connection options with sensible defaults.

use std::time::Duration;

/// Connection options for a [`Session`](crate::Session)
///
/// Immutable after construction; one `Options` value describes one
/// remote server.
#[derive(Debug, Clone)]
pub struct Options {
    // -------------------------------------------------------------------------
    // Target Configuration
    // -------------------------------------------------------------------------
    /// Server hostname or IP address
    pub host: String,

    /// Server RCON port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Authentication Configuration
    // -------------------------------------------------------------------------
    /// RCON password; `None` skips the authentication handshake entirely
    pub password: Option<String>,

    // -------------------------------------------------------------------------
    // Transport Configuration
    // -------------------------------------------------------------------------
    /// Applied as the connect, read, and write timeout on the socket
    pub timeout: Duration,
}

/// Default socket timeout (connect/read/write)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

impl Default for Options {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 27015,
            password: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Options {
    /// Create a new options builder
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// `host:port` form used when dialing
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for Options
#[derive(Default)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    /// Set the server hostname or IP address
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.options.host = host.into();
        self
    }

    /// Set the server RCON port
    pub fn port(mut self, port: u16) -> Self {
        self.options.port = port;
        self
    }

    /// Set the RCON password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.options.password = Some(password.into());
        self
    }

    /// Set the socket timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    pub fn build(self) -> Options {
        self.options
    }
}
