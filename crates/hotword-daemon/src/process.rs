use hotword_core::{HotwordError, Result};
use std::path::Path;
use std::process::Command;

/// Verify if a process with the given PID is running
#[cfg(unix)]
pub fn verify_process_running(pid: u32) -> bool {
    // kill -0 only checks that the process exists
    let output = Command::new("kill")
        .args(["-0", &pid.to_string()])
        .output();

    if let Ok(output) = output {
        output.status.success()
    } else {
        false
    }
}

#[cfg(windows)]
pub fn verify_process_running(pid: u32) -> bool {
    let output = Command::new("tasklist")
        .args(["/FI", &format!("PID eq {}", pid), "/NH"])
        .output();

    if let Ok(output) = output {
        let output_str = String::from_utf8_lossy(&output.stdout);
        output_str.contains(&pid.to_string())
    } else {
        false
    }
}

#[cfg(not(any(unix, windows)))]
pub fn verify_process_running(_pid: u32) -> bool {
    true
}

/// Open a file or directory with the desktop's default handler
pub fn open_path(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    let status = Command::new("open").arg(path).status();

    #[cfg(target_os = "windows")]
    let status = Command::new("cmd")
        .args(["/c", "start", ""])
        .arg(path)
        .status();

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let status = Command::new("xdg-open").arg(path).status();

    match status {
        Ok(exit_status) if exit_status.success() => Ok(()),
        Ok(exit_status) => Err(HotwordError::Other(format!(
            "Failed to open {}: process exited with code {:?}",
            path.display(),
            exit_status.code()
        ))),
        Err(e) => Err(HotwordError::Io(e)),
    }
}

#[cfg(target_os = "linux")]
pub fn detect_display_server() -> String {
    use std::env;

    if env::var("WAYLAND_DISPLAY").is_ok() {
        "Wayland".to_string()
    } else if env::var("DISPLAY").is_ok() {
        "X11".to_string()
    } else {
        "none".to_string()
    }
}

#[cfg(target_os = "linux")]
pub fn is_running_as_sudo() -> bool {
    std::env::var("SUDO_USER").is_ok()
}
