use chrono::{DateTime, Local};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger as SizeBasedTriggerPolicy;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::{
    append::rolling_file::RollingFileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config, Handle,
};
use std::env;
use std::path::{Path, PathBuf};
use crate::config::{LogConfig, LoggerConfig, ROOT_PREFIX};

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S:%3f)} {l} [{M}:{L}] - {m}{n}";
const CONSOLE_APPENDER: &str = "console_appender";

pub struct Logger {
    #[allow(dead_code)]
    handle: Handle,
}

impl Logger {
    pub fn new_from_yaml(config_path: impl Into<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let config = LogConfig::from_yaml(config_path)?;
        Self::new_from_config(config)
    }

    pub fn new_from_config(config: LogConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let final_config = Self::build_config(&config)?;
        let handle = log4rs::init_config(final_config)?;
        Ok(Self { handle })
    }

    /// Translate a [`LogConfig`] into a log4rs [`Config`] without installing it.
    pub fn build_config(config: &LogConfig) -> Result<Config, Box<dyn std::error::Error>> {
        let base_dir = Self::output_dir(config);
        let mut log4rs_config = Config::builder();

        // One appender plus one non-additive logger per module prefix
        for logger_config in config.loggers.iter().filter(|l| l.path_prefix != ROOT_PREFIX) {
            let appender = Self::create_appender(&base_dir, logger_config)?;
            let appender_name = format!("{}_appender", logger_config.path_prefix);
            log4rs_config = log4rs_config
                .appender(Appender::builder().build(&appender_name, Box::new(appender)));

            let logger = log4rs::config::Logger::builder()
                .appender(appender_name)
                .additive(false)
                .build(
                    logger_config.path_prefix.clone(),
                    Self::parse_level(&logger_config.level),
                );
            log4rs_config = log4rs_config.logger(logger);
        }

        let root = match config.get_root_config() {
            Some(root_config) => {
                let root_appender_name = format!("{}_appender", ROOT_PREFIX);
                let root_appender = Self::create_appender(&base_dir, root_config)?;
                log4rs_config = log4rs_config.appender(
                    Appender::builder().build(&root_appender_name, Box::new(root_appender)),
                );
                let mut root = Root::builder().appender(root_appender_name);
                if root_config.console {
                    log4rs_config = log4rs_config.appender(
                        Appender::builder().build(CONSOLE_APPENDER, Box::new(Self::create_console())),
                    );
                    root = root.appender(CONSOLE_APPENDER);
                }
                root.build(Self::parse_level(&root_config.level))
            }
            None => {
                log4rs_config = log4rs_config.appender(
                    Appender::builder().build(CONSOLE_APPENDER, Box::new(Self::create_console())),
                );
                Root::builder().appender(CONSOLE_APPENDER).build(LevelFilter::Info)
            }
        };

        Ok(log4rs_config.build(root)?)
    }

    fn output_dir(config: &LogConfig) -> PathBuf {
        config
            .output_dir
            .clone()
            .or_else(|| env::var("LOG_OUTPUT_DIR").ok())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn create_console() -> ConsoleAppender {
        ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build()
    }

    fn create_appender(
        base_dir: &Path,
        config: &LoggerConfig,
    ) -> Result<RollingFileAppender, Box<dyn std::error::Error>> {
        let log_directory = base_dir.join(&config.log_directory);
        std::fs::create_dir_all(&log_directory)?;

        let now: DateTime<Local> = Local::now();
        let formatted_time = now.format("%Y%m%d%H%M%S%3f").to_string();

        let log_file = log_directory.join(&config.log_file_name);
        let archived_log_pattern = format!(
            "{}/{}-{{}}-{}.gz",
            log_directory.display(), config.log_file_name, formatted_time
        );

        let size_trigger = SizeBasedTriggerPolicy::new(config.max_file_size);
        let roller =
            FixedWindowRoller::builder().build(&archived_log_pattern, config.max_zip_count)?;
        let compound_policy = CompoundPolicy::new(Box::new(size_trigger), Box::new(roller));

        let appender = RollingFileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build(log_file, Box::new(compound_policy))?;

        Ok(appender)
    }

    pub(crate) fn parse_level(level: &str) -> LevelFilter {
        match level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger_config(prefix: &str, file: &str, level: &str) -> LoggerConfig {
        LoggerConfig {
            path_prefix: prefix.to_string(),
            log_directory: "logs".to_string(),
            log_file_name: file.to_string(),
            max_file_size: 1024 * 1024,
            max_zip_count: 3,
            level: level.to_string(),
            console: false,
        }
    }

    #[test]
    fn test_parse_level_falls_back_to_info() {
        assert_eq!(Logger::parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(Logger::parse_level("off"), LevelFilter::Off);
        assert_eq!(Logger::parse_level("verbose"), LevelFilter::Info);
    }

    #[test]
    fn test_build_config_creates_log_directories() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig {
            output_dir: Some(dir.path().display().to_string()),
            loggers: vec![
                logger_config("root", "lock.log", "info"),
                logger_config("distributed_lock", "distributed_lock.log", "debug"),
            ],
        };

        let built = Logger::build_config(&config).unwrap();
        assert!(dir.path().join("logs").is_dir());
        assert_eq!(built.root().level(), LevelFilter::Info);
        assert_eq!(built.loggers().len(), 1);
        assert_eq!(built.loggers()[0].name(), "distributed_lock");
    }
}
