use crate::keyboard_listener::start_keyboard_listener;
use crate::permissions::check_and_request_permissions;
use crate::process::verify_process_running;
use crate::watcher::ConfigWatcher;
use hotword_core::config::{
    ensure_config_dir, get_config_file_path, get_daemon_log_path, get_pid_file_path,
};
use hotword_core::storage::load_rules_from;
use hotword_core::{
    is_daemon_running, load_rules, load_settings, ActionSink, EventHub, HotwordError, LogSink,
    PasteSink, ReloadController, Result, RuleSet, Settings, SinkFactory,
};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::{self, Command};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// How often the worker checks the rule file for changes.
const CHECK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerOptions {
    /// Log completions instead of typing and pasting.
    pub dry_run: bool,
}

/// Start the daemon process
pub fn start_daemon() -> Result<()> {
    if let Some(pid) = is_daemon_running()? {
        if verify_process_running(pid) {
            println!("Daemon is already running with PID {}.", pid);
            return Ok(());
        }
        println!("Found stale PID file. Cleaning up and starting new daemon...");
        let _ = fs::remove_file(get_pid_file_path());
    }

    println!("Starting hotword daemon...");

    let config_dir = ensure_config_dir()?;
    check_and_request_permissions()?;

    let current_exe = std::env::current_exe()?;
    let daemon_log_file = get_daemon_log_path();

    #[cfg(unix)]
    {
        let cmd = format!(
            "nohup '{}' daemon-worker > '{}' 2>&1 &",
            current_exe.to_string_lossy(),
            daemon_log_file.to_string_lossy()
        );
        Command::new("sh").arg("-c").arg(&cmd).status()?;
    }

    #[cfg(windows)]
    {
        let cmd = format!(
            "START /B \"hotword daemon\" \"{}\" daemon-worker > \"{}\" 2>&1",
            current_exe.to_string_lossy(),
            daemon_log_file.to_string_lossy()
        );
        Command::new("cmd").arg("/C").arg(&cmd).status()?;
    }

    // Wait for the daemon to start and create its PID file
    for _ in 0..20 {
        thread::sleep(Duration::from_millis(100));
        if is_daemon_running()?.is_some() {
            break;
        }
    }

    match is_daemon_running()? {
        Some(pid) if verify_process_running(pid) => {
            println!("Daemon started successfully with PID {}.", pid);
            println!("Rules are read from {}", config_dir.join("config.txt").display());
            Ok(())
        }
        Some(_) => Err(HotwordError::Other(format!(
            "Daemon process failed to start. Check logs at {}",
            daemon_log_file.display()
        ))),
        None => Err(HotwordError::Other(format!(
            "Daemon failed to start. Check logs at {}",
            daemon_log_file.display()
        ))),
    }
}

/// Program and leading arguments of a kill command; the PID is appended.
type KillCommand = (&'static str, &'static [&'static str]);

#[cfg(windows)]
const GRACEFUL_KILL: KillCommand = ("taskkill", &["/PID"]);
#[cfg(windows)]
const FORCE_KILL: KillCommand = ("taskkill", &["/F", "/T", "/PID"]);

#[cfg(not(windows))]
const GRACEFUL_KILL: KillCommand = ("kill", &[]);
#[cfg(not(windows))]
const FORCE_KILL: KillCommand = ("kill", &["-9"]);

/// How long a signalled daemon gets to exit before it is force killed.
const STOP_GRACE: Duration = Duration::from_millis(500);

fn send_kill((program, args): KillCommand, pid: u32) -> bool {
    Command::new(program)
        .args(args)
        .arg(pid.to_string())
        .status()
        .is_ok_and(|status| status.success())
}

/// Ask `pid` to exit with `graceful`, escalating to `force` if it is still
/// alive after [`STOP_GRACE`]. Returns whether the process is gone.
fn terminate(pid: u32, graceful: KillCommand, force: KillCommand) -> bool {
    if send_kill(graceful, pid) {
        println!("Sent termination signal to daemon with PID {}", pid);
    }

    let deadline = Instant::now() + STOP_GRACE;
    while Instant::now() < deadline {
        if !verify_process_running(pid) {
            return true;
        }
        thread::sleep(Duration::from_millis(50));
    }

    println!("Daemon didn't terminate gracefully, using force kill...");
    if send_kill(force, pid) {
        println!("Force killed daemon with PID {}", pid);
        return true;
    }
    !verify_process_running(pid)
}

/// Stop the daemon if it's running
pub fn stop_daemon() -> Result<()> {
    let pid_file = get_pid_file_path();

    if !pid_file.exists() {
        return Err(HotwordError::DaemonNotRunning);
    }

    let pid = fs::read_to_string(&pid_file)
        .map_err(|e| HotwordError::Other(format!("Failed to read PID file: {}", e)))
        .and_then(|content| {
            content
                .trim()
                .parse::<u32>()
                .map_err(|_| HotwordError::InvalidPid)
        });
    let pid = match pid {
        Ok(pid) => pid,
        Err(e) => {
            let _ = fs::remove_file(&pid_file);
            return Err(e);
        }
    };

    println!("Attempting to stop daemon with PID {}...", pid);

    if !verify_process_running(pid) {
        println!("Process with PID {} is not running.", pid);
    } else if terminate(pid, GRACEFUL_KILL, FORCE_KILL) {
        println!("Daemon stopped successfully.");
    } else {
        println!("WARNING: Failed to stop daemon process. PID file will be removed anyway.");
    }

    let _ = fs::remove_file(&pid_file);
    Ok(())
}

/// Check daemon status
pub fn daemon_status() -> Result<()> {
    match is_daemon_running()? {
        Some(pid) if verify_process_running(pid) => {
            println!("hotword daemon is running with PID {}", pid);
            println!("Rules: {}", get_config_file_path().display());
            println!("Log:   {}", get_daemon_log_path().display());
        }
        Some(pid) => {
            println!("PID file exists but process {} is not running", pid);
            println!("This could indicate the daemon crashed or was stopped abruptly");
            println!("Recommend running 'hotword stop' followed by 'hotword start'");
        }
        None => println!("hotword daemon is not running"),
    }
    Ok(())
}

fn current_settings() -> Settings {
    load_settings().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable settings file");
        Settings::default()
    })
}

fn sink_factory(options: WorkerOptions) -> SinkFactory {
    if options.dry_run {
        Box::new(|| Box::new(LogSink) as Box<dyn ActionSink>)
    } else {
        // Settings are re-read per generation so a reload picks them up.
        Box::new(|| Box::new(PasteSink::new(current_settings())) as Box<dyn ActionSink>)
    }
}

/// Take the mtime baseline, then read the rules. A write landing between the
/// two is reported by the first poll instead of being lost.
fn watch_and_load(path: &Path) -> Result<(ConfigWatcher, RuleSet)> {
    let watcher = ConfigWatcher::new(path.to_path_buf());
    let rules = load_rules_from(path)?;
    Ok((watcher, rules))
}

/// The worker loop: hook the keyboard, run the engine, reload on change.
///
/// Only returns on failure; the process is normally ended by a signal.
pub fn run_daemon_worker(options: WorkerOptions) -> Result<()> {
    ensure_config_dir()?;
    let settings = current_settings();

    let hub = Arc::new(EventHub::new());
    let keyboard_thread = start_keyboard_listener(Arc::clone(&hub))?;

    let (mut watcher, rules) = watch_and_load(&get_config_file_path())?;

    let controller = ReloadController::new(hub, sink_factory(options))
        .with_slow_action_threshold(settings.slow_action_threshold());
    controller.start(rules)?;

    loop {
        thread::sleep(CHECK_INTERVAL);

        if keyboard_thread.is_finished() {
            controller.stop();
            return Err(HotwordError::Keyboard(
                "Keyboard listener stopped unexpectedly".to_string(),
            ));
        }

        if let Some(generation) = controller.recover()? {
            tracing::warn!(generation, "engine restarted with the current rules");
        }

        if watcher.poll() {
            tracing::info!("config file changed, reloading rules");
            match load_rules() {
                Ok(rules) => {
                    controller.reload(rules)?;
                }
                Err(e) => tracing::warn!(error = %e, "keeping current rules"),
            }
        }
    }
}

/// Entry point of the daemon process: single-instance check, PID file,
/// worker loop, PID file cleanup.
pub fn daemon_worker_entry(options: WorkerOptions) -> Result<()> {
    if let Some(pid) = is_daemon_running()? {
        if pid != process::id() && verify_process_running(pid) {
            return Err(HotwordError::DaemonAlreadyRunning(pid));
        }
    }

    ensure_config_dir()?;
    let pid_file = get_pid_file_path();
    let mut file = File::create(&pid_file)?;
    write!(file, "{}", process::id())?;
    drop(file);

    tracing::info!(pid = process::id(), "hotword daemon worker started");
    let result = run_daemon_worker(options);

    let _ = fs::remove_file(&pid_file);

    result
}
