const CRATE_TARGET: &str = "sheet_wrap";
const LIBS_DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Warn;

/// Initializes logger for current environment.
///
/// In case of any error, basic logger, that does nothing, is returned. Errors
/// can possibly happen in case of file permission errors in release build.
pub fn init() -> Result<(), log::SetLoggerError> {
    let base_logger = fern::Dispatch::new();
    let env_specific_logger = init_env_specific(base_logger);

    env_specific_logger.apply()
}

/// Parses a level name as used in `SW_LIBS_LOG_LEVEL`.
#[cfg_attr(not(debug_assertions), allow(dead_code))]
fn parse_level(level: &str) -> Option<log::LevelFilter> {
    match level {
        "error" => Some(log::LevelFilter::Error),
        "warning" | "warn" => Some(log::LevelFilter::Warn),
        "info" => Some(log::LevelFilter::Info),
        "debug" => Some(log::LevelFilter::Debug),
        "trace" => Some(log::LevelFilter::Trace),
        "off" => Some(log::LevelFilter::Off),
        _ => None,
    }
}

#[cfg(debug_assertions)]
pub fn init_env_specific(base_logger: fern::Dispatch) -> fern::Dispatch {
    use std::env;

    use fern::colors::{Color, ColoredLevelConfig};

    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Cyan)
        .debug(Color::BrightWhite)
        .trace(Color::White);
    let base_logger = base_logger.format(move |out, message, record| {
        out.finish(format_args!(
            "{} [{}] [{}] {}",
            chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
            record.target(),
            colors.color(record.level()),
            message
        ))
    });
    let libs_log_level = env::var("SW_LIBS_LOG_LEVEL")
        .ok()
        .and_then(|libs_log_level| parse_level(&libs_log_level))
        .unwrap_or(LIBS_DEFAULT_LOG_LEVEL);

    base_logger
        .level(libs_log_level)
        .level_for(CRATE_TARGET, log::LevelFilter::Debug)
        .chain(std::io::stdout())
}

#[cfg(not(debug_assertions))]
pub fn init_env_specific(base_logger: fern::Dispatch) -> fern::Dispatch {
    use std::fs;

    let path = match dirs::data_local_dir() {
        Some(data_dir) => data_dir.join("sheet_wrap").join("logs"),
        None => return base_logger,
    };

    if !path.exists() {
        let result = fs::create_dir_all(&path);

        if result.is_err() {
            return base_logger;
        }
    }

    let today_format = chrono::Local::today().format("%Y-%m-%d");
    let file_name = path.join(format!("{}.log", today_format));
    let file = match fern::log_file(file_name) {
        Ok(file) => file,
        Err(_) => return base_logger,
    };

    base_logger
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} [{}] [{}] {}",
                chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(LIBS_DEFAULT_LOG_LEVEL)
        .level_for(CRATE_TARGET, log::LevelFilter::Info)
        .chain(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("warning"), Some(log::LevelFilter::Warn));
        assert_eq!(parse_level("trace"), Some(log::LevelFilter::Trace));
        assert_eq!(parse_level("verbose"), None);
    }
}
