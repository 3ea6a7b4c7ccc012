use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HotwordError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Keyboard controller error: {0}")]
    Enigo(String),

    #[error("Keyboard error: {0}")]
    Keyboard(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Config file not found at: {0}")]
    ConfigNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Trigger sequence must contain at least one character")]
    EmptyTrigger,

    #[error("No rule with trigger '{0}'")]
    RuleNotFound(String),

    #[error("An engine generation is still subscribed to key events")]
    SubscriptionActive,

    #[error("Daemon already running with PID {0}")]
    DaemonAlreadyRunning(u32),

    #[error("Daemon is not running")]
    DaemonNotRunning,

    #[error("Invalid PID in daemon file")]
    InvalidPid,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HotwordError>;
