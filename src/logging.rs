/// log4rs setup for binaries and tests that embed the adaptor
///
use anyhow::Result;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;

pub const LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%S%.3f)} {l} {t} - {m}{n}";

/// the console configuration used by `init_console`
pub fn console_config(level: LevelFilter) -> Result<Config> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))?;

    Ok(config)
}

/// log to stdout at the given level; fails if a logger is already installed
pub fn init_console(level: LevelFilter) -> Result<()> {
    log4rs::init_config(console_config(level)?)?;
    Ok(())
}

/// load a log4rs yaml config file
pub fn init_file<P: AsRef<Path>>(path: P) -> Result<()> {
    log4rs::init_file(path, Default::default())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console() {
        let config = console_config(LevelFilter::Debug).expect("should build the config");
        assert_eq!(config.root().level(), LevelFilter::Debug);
        assert_eq!(config.appenders().len(), 1);
    }

    #[test]
    fn console_installs_once() {
        // the only test in this crate that installs a global logger
        assert!(init_console(LevelFilter::Warn).is_ok());
        assert_eq!(log::max_level(), LevelFilter::Warn);
        assert!(init_console(LevelFilter::Info).is_err());
    }

    #[test]
    fn missing_file() {
        assert!(init_file("no/such/log4rs.yaml").is_err());
    }
}
