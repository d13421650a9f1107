use std::path::PathBuf;

pub const LOG_FILE_NAME: &str = "av.log";

/// Where `av_log!` appends. Falls back to the working directory when the
/// home directory cannot be determined.
pub fn log_path() -> PathBuf {
    crate::disk_storage::data_dir()
        .map(|dir| dir.join(LOG_FILE_NAME))
        .unwrap_or_else(|_| PathBuf::from(LOG_FILE_NAME))
}

/// Appends a timestamped line to the diagnostics log. Never panics, a log
/// line that cannot be written is dropped. Disabled under `cfg(test)`.
#[macro_export]
macro_rules! av_log {
    ($($arg:tt)*) => {{
        use std::fs::OpenOptions;
        use std::io::Write;

        if !cfg!(test) {
            let path = $crate::log::log_path();
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }

            if let Ok(mut file) = OpenOptions::new().append(true).create(true).open(&path) {
                let _ = writeln!(
                    file,
                    "[{}] {}",
                    $crate::chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    format_args!($($arg)*)
                );
            }
        }
    }};
}
