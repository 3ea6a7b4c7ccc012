use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Polls a file's modification time.
pub struct ConfigWatcher {
    path: PathBuf,
    last_modified: Option<SystemTime>,
}

impl ConfigWatcher {
    pub fn new(path: PathBuf) -> Self {
        let last_modified = modified(&path);
        Self {
            path,
            last_modified,
        }
    }

    /// True once per change of the modification time. A file that
    /// disappears is not a change; its reappearance is.
    pub fn poll(&mut self) -> bool {
        let Some(current) = modified(&self.path) else {
            return false;
        };

        if self.last_modified == Some(current) {
            return false;
        }
        self.last_modified = Some(current);
        true
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;

    fn set_mtime(path: &Path, time: SystemTime) {
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    #[test]
    fn reports_each_change_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.txt");
        fs::write(&path, "hw=Hello\n").unwrap();
        let base = SystemTime::now() - Duration::from_secs(60);
        set_mtime(&path, base);

        let mut watcher = ConfigWatcher::new(path.clone());
        assert!(!watcher.poll());

        set_mtime(&path, base + Duration::from_secs(5));
        assert!(watcher.poll());
        assert!(!watcher.poll());
    }

    #[test]
    fn missing_file_is_quiet_until_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.txt");

        let mut watcher = ConfigWatcher::new(path.clone());
        assert!(!watcher.poll());

        fs::write(&path, "hw=Hello\n").unwrap();
        assert!(watcher.poll());
    }
}
