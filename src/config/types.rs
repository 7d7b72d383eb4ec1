//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Check every section, returning the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        self.connection.validate()?;
        self.codec.validate()?;
        self.log.validate()
    }
}

/// Socket settings for `turtle connect`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// How long to wait for the TCP handshake
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Socket read timeout; bounds how quickly a disconnect is noticed
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    /// Socket write timeout; a peer that stops reading fails the writer
    /// after this long instead of stalling disconnect
    #[serde(default = "default_write_timeout_ms")]
    pub write_timeout_ms: u64,
}

pub fn default_connect_timeout_ms() -> u64 {
    20_000
}

pub fn default_read_timeout_ms() -> u64 {
    250
}

pub fn default_write_timeout_ms() -> u64 {
    10_000
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout_ms(),
            read_timeout_ms: default_read_timeout_ms(),
            write_timeout_ms: default_write_timeout_ms(),
        }
    }
}

impl ConnectionConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.connect_timeout_ms == 0 {
            return Err("connection.connect_timeout_ms must be > 0".to_string());
        }
        if self.read_timeout_ms == 0 {
            return Err("connection.read_timeout_ms must be > 0".to_string());
        }
        if self.write_timeout_ms == 0 {
            return Err("connection.write_timeout_ms must be > 0".to_string());
        }
        Ok(())
    }
}

/// Buffer sizes for the stream codec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Bytes requested from the source per read
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,
    /// Most text bytes decoded into a single token
    #[serde(default = "default_text_buffer_size")]
    pub text_buffer_size: usize,
    /// Longest sub-negotiation kept before it is discarded
    #[serde(default = "default_max_subnegotiation")]
    pub max_subnegotiation: usize,
}

pub fn default_read_buffer_size() -> usize {
    1000
}

pub fn default_text_buffer_size() -> usize {
    1000
}

pub fn default_max_subnegotiation() -> usize {
    8192
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: default_read_buffer_size(),
            text_buffer_size: default_text_buffer_size(),
            max_subnegotiation: default_max_subnegotiation(),
        }
    }
}

impl CodecConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.read_buffer_size == 0 {
            return Err("codec.read_buffer_size must be > 0".to_string());
        }
        if self.text_buffer_size < 4 {
            return Err(format!(
                "codec.text_buffer_size {} is below minimum (4)",
                self.text_buffer_size
            ));
        }
        if self.max_subnegotiation < 4 {
            return Err(format!(
                "codec.max_subnegotiation {} is below minimum (4)",
                self.max_subnegotiation
            ));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when TURTLE_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

pub fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LogConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("log.level must not be empty".to_string());
        }
        Ok(())
    }
}
