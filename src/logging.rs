use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

use crate::{runtime_paths, DESKTOP_LOG_FILE};

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub(crate) fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

pub(crate) fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

pub(crate) fn resolve_desktop_log_path(root_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    root_dir
        .map(|root| root.join("logs").join(file_name))
        .unwrap_or_else(|| std::env::temp_dir().join(file_name))
}

fn append_line(path: &Path, line: &str) {
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(file, "{line}");
    }
}

fn append_log(scope: &str, message: &str) {
    let line = format!(
        "[{}] [{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        scope,
        message
    );
    let path = resolve_desktop_log_path(runtime_paths::default_root_dir(), DESKTOP_LOG_FILE);
    append_line(&path, &line);
    if is_verbose() {
        eprintln!("{line}");
    }
}

pub(crate) fn append_startup_log(message: &str) {
    append_log("startup", message);
}

pub(crate) fn append_desktop_log(message: &str) {
    append_log("desktop", message);
}

pub(crate) fn append_restart_log(message: &str) {
    append_log("restart", message);
}

pub(crate) fn append_shutdown_log(message: &str) {
    append_log("shutdown", message);
}

/// Diagnostic detail that only matters when `-V/--verbose` is set.
pub(crate) fn append_verbose_log(message: &str) {
    if is_verbose() {
        append_log("verbose", message);
    }
}
