use crate::error::KineticsError;
use crate::settings::LogSettings;
use log::info;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;

/// parses a level name ("off", "error", "warn", "info", "debug", "trace")
pub fn parse_level(level: &str) -> Result<LevelFilter, KineticsError> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| KineticsError::config("init_logger", format!("unknown log level '{}'", level)))
}

/// installs a terminal logger and, if a file is configured, a file logger next to it.
/// May be called once per process; a second call returns a ConfigurationError.
pub fn init_logger(settings: &LogSettings) -> Result<(), KineticsError> {
    let level = parse_level(&settings.level)?;
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = &settings.log_file {
        let file = File::create(path)?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }
    CombinedLogger::init(loggers)
        .map_err(|e| KineticsError::config("init_logger", e.to_string()))?;
    info!("logger started at level {}", level);
    Ok(())
}
