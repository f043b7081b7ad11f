use crate::Utils::config::LogLevel;
use chrono::Local;
use log::warn;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// `sculpt_log_<date>_<time>.txt` inside `dir`
pub fn log_file_path(dir: &Path) -> PathBuf {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    dir.join(format!("sculpt_log_{}.txt", date_and_time))
}

/// Terminal logger plus, if `log_dir` is given, a timestamped log file in it.
/// Returns the path of the log file, or `None` if nothing new was installed: a logger set up
/// earlier in the process stays in place and no file is left behind.
pub fn init_logger(level: LogLevel, log_dir: Option<&Path>) -> io::Result<Option<PathBuf>> {
    let level: LevelFilter = level.into();
    if level == LevelFilter::Off {
        return Ok(None);
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    let path = match log_dir {
        Some(dir) => {
            let path = log_file_path(dir);
            let file = File::create(&path)?;
            loggers.push(WriteLogger::new(level, Config::default(), file));
            Some(path)
        }
        None => None,
    };
    if let Err(e) = CombinedLogger::init(loggers) {
        warn!("logger already installed, keeping it: {}", e);
        if let Some(path) = &path {
            std::fs::remove_file(path)?;
        }
        return Ok(None);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_only_for_the_installed_logger() {
        let first_dir = tempfile::tempdir().unwrap();
        if let Some(path) = init_logger(LogLevel::Info, Some(first_dir.path())).unwrap() {
            assert!(path.exists());
            assert!(path.starts_with(first_dir.path()));
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            assert!(name.starts_with("sculpt_log_") && name.ends_with(".txt"));
        }
        // a logger is in place now, whoever installed it
        let second_dir = tempfile::tempdir().unwrap();
        assert_eq!(init_logger(LogLevel::Debug, Some(second_dir.path())).unwrap(), None);
        assert_eq!(std::fs::read_dir(second_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_off_installs_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(init_logger(LogLevel::Off, Some(dir.path())).unwrap(), None);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(LevelFilter::from(LogLevel::Warn), LevelFilter::Warn);
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::Trace);
    }
}
