use hotword_core::{HotwordError, Result};

#[cfg(target_os = "linux")]
use crate::process::{detect_display_server, is_running_as_sudo};

/// Check that the platform lets us watch the keyboard and simulate input.
///
/// Problems that may still work out are printed as guidance; conditions
/// that make the hook impossible are returned as errors.
pub fn check_and_request_permissions() -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        if !has_accessibility_permission() {
            print_macos_instructions();
            return Err(HotwordError::PermissionDenied(
                "hotword needs Accessibility and Input Monitoring permissions".to_string(),
            ));
        }
    }

    #[cfg(target_os = "linux")]
    {
        match detect_display_server().as_str() {
            "X11" => {}
            "Wayland" => {
                println!("⚠️  Wayland session detected.");
                println!("hotword reads keys through X11; only XWayland applications");
                println!("will be expanded. Log in to an X11 session for full coverage.");
            }
            _ => {
                if !is_running_as_sudo() {
                    return Err(HotwordError::PermissionDenied(
                        "no graphical session found (DISPLAY is not set)".to_string(),
                    ));
                }
            }
        }
    }

    #[cfg(target_os = "windows")]
    {
        println!("⚠️  hotword monitors keyboard input to detect triggers");
        println!("Some antivirus programs flag or block keyboard hooks.");
        println!("If expansions do not happen, check your antivirus settings.");
    }

    Ok(())
}

#[cfg(target_os = "macos")]
fn has_accessibility_permission() -> bool {
    use std::process::Command;

    let apple_script_test = Command::new("osascript")
        .arg("-e")
        .arg("tell application \"System Events\" to return name of first process")
        .output();

    match apple_script_test {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}

#[cfg(target_os = "macos")]
fn print_macos_instructions() {
    println!("⚠️  hotword needs accessibility permissions to detect keyboard input");
    println!("--------------------------------------------------------------------");
    println!("1. Open System Settings > Privacy & Security > Accessibility");
    println!("2. Enable the terminal application you start hotword from");
    println!("3. On macOS 14 or newer, enable it under Input Monitoring as well");
    println!("4. Run 'hotword start' again");
}
