mod daemon_manager;
mod keyboard_listener;
mod permissions;
mod process;
mod watcher;

// Re-export the main functionality
pub use daemon_manager::{
    daemon_status, daemon_worker_entry, run_daemon_worker, start_daemon, stop_daemon,
    WorkerOptions,
};
pub use keyboard_listener::start_keyboard_listener;
pub use process::{open_path, verify_process_running};
pub use watcher::ConfigWatcher;
