use crate::error::Result;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const HOME_ENV: &str = "HOTWORD_HOME";
pub const PID_FILENAME: &str = "hotword-daemon.pid";
pub const CONFIG_FILENAME: &str = "config.txt";
pub const SETTINGS_FILENAME: &str = "settings.json";
pub const DAEMON_LOG_FILENAME: &str = "daemon_log.txt";

/// Written when no rule file exists yet.
pub const SAMPLE_CONFIG: &str = "\
# One expansion rule per line, written as: trigger=replacement
# Type the trigger anywhere and it is replaced with the text after '='.
# Triggers are matched exactly and case-sensitively; keep them to
# lowercase letters and digits to avoid surprises with shifted keys.
# Lines starting with '#' are comments and are ignored.
# Note: expansions go through the clipboard, which is overwritten.

hw=Hello, world!
";

/// Get the hotword configuration directory
pub fn get_config_dir() -> PathBuf {
    resolve_config_dir(env::var(HOME_ENV).ok(), env::var("HOME").ok())
}

/// `$HOTWORD_HOME` when set and non-blank, else `$HOME/.hotword`, else a
/// `.hotword` directory relative to the working directory.
fn resolve_config_dir(hotword_home: Option<String>, home: Option<String>) -> PathBuf {
    match (hotword_home, home) {
        (Some(dir), _) if !dir.trim().is_empty() => PathBuf::from(dir),
        (_, Some(home)) => PathBuf::from(home).join(".hotword"),
        (_, None) => PathBuf::from(".hotword"),
    }
}

/// Ensure the configuration directory and rule file exist
pub fn ensure_config_dir() -> Result<PathBuf> {
    let config_dir = get_config_dir();
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    let config_path = get_config_file_path();
    if !config_path.exists() {
        create_sample_config(&config_path)?;
    }

    Ok(config_dir)
}

/// Write the commented sample rule file
pub fn create_sample_config(path: &Path) -> Result<()> {
    tracing::info!(path = %path.display(), "creating sample config file");
    fs::write(path, SAMPLE_CONFIG)?;
    Ok(())
}

/// Get the path to the PID file
pub fn get_pid_file_path() -> PathBuf {
    get_config_dir().join(PID_FILENAME)
}

/// Get the path to the rule file
pub fn get_config_file_path() -> PathBuf {
    get_config_dir().join(CONFIG_FILENAME)
}

pub fn get_settings_file_path() -> PathBuf {
    get_config_dir().join(SETTINGS_FILENAME)
}

pub fn get_daemon_log_path() -> PathBuf {
    get_config_dir().join(DAEMON_LOG_FILENAME)
}

/// Check if daemon is running according to the PID file
pub fn is_daemon_running() -> Result<Option<u32>> {
    let pid_file = get_pid_file_path();

    if pid_file.exists() {
        match fs::read_to_string(&pid_file) {
            Ok(contents) => {
                match contents.trim().parse::<u32>() {
                    Ok(pid) => Ok(Some(pid)),
                    Err(_) => {
                        // Invalid PID, treat as not running and clean up
                        let _ = fs::remove_file(&pid_file);
                        Ok(None)
                    }
                }
            }
            Err(_) => {
                let _ = fs::remove_file(&pid_file);
                Ok(None)
            }
        }
    } else {
        Ok(None)
    }
}
