use chrono::Local;
use log::LevelFilter;
use std::path::PathBuf;
use std::sync::OnceLock;

static INSTALLED: OnceLock<Result<(), String>> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub file_dir: Option<PathBuf>,
}

impl LogSettings {
    // IBAN_LOG_LEVEL wins over RUST_LOG; a file is written only when
    // IBAN_LOG_DIR names a directory.
    pub fn from_env() -> Self {
        let level = std::env::var("IBAN_LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok();
        let dir = std::env::var("IBAN_LOG_DIR").ok();
        Self::from_values(level.as_deref(), dir.as_deref())
    }

    pub fn from_values(level: Option<&str>, dir: Option<&str>) -> Self {
        let level = level
            .and_then(|value| value.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info);
        let file_dir = match dir.map(str::trim) {
            None | Some("") | Some("off") | Some("none") => None,
            Some(path) => Some(PathBuf::from(path)),
        };
        Self { level, file_dir }
    }

    fn file_path(&self, app_name: &str) -> Option<PathBuf> {
        let date = Local::now().format("%Y_%m_%d");
        self.file_dir
            .as_ref()
            .map(|dir| dir.join(format!("{app_name}-{date}.log")))
    }
}

/// Installs the global logger once per process; later calls return the
/// first outcome.
pub fn init_logging(app_name: &str) -> Result<(), String> {
    INSTALLED
        .get_or_init(|| install(app_name, &LogSettings::from_env()))
        .clone()
}

fn install(app_name: &str, settings: &LogSettings) -> Result<(), String> {
    let mut dispatch = fern::Dispatch::new()
        .level(settings.level)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} | {:<5} | {} | {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(std::io::stdout());

    if let (Some(dir), Some(path)) = (&settings.file_dir, settings.file_path(app_name)) {
        std::fs::create_dir_all(dir).map_err(|err| err.to_string())?;
        dispatch = dispatch.chain(fern::log_file(path).map_err(|err| err.to_string())?);
    }

    dispatch.apply().map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_defaults_to_info() {
        assert_eq!(LogSettings::from_values(None, None).level, LevelFilter::Info);
        assert_eq!(LogSettings::from_values(Some("loud"), None).level, LevelFilter::Info);
        assert_eq!(LogSettings::from_values(Some("debug"), None).level, LevelFilter::Debug);
        assert_eq!(LogSettings::from_values(Some("off"), None).level, LevelFilter::Off);
    }

    #[test]
    fn log_file_is_opt_in() {
        assert_eq!(LogSettings::from_values(None, None).file_dir, None);
        assert_eq!(LogSettings::from_values(None, Some("off")).file_dir, None);
        assert_eq!(LogSettings::from_values(None, Some(" ")).file_dir, None);
        assert_eq!(
            LogSettings::from_values(None, Some("logs")).file_dir,
            Some(PathBuf::from("logs"))
        );
    }

    #[test]
    fn file_name_carries_app_and_date() {
        let settings = LogSettings::from_values(None, Some("logs"));
        let path = settings.file_path("iban-checker").unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("iban-checker-"));
        assert!(name.ends_with(".log"));
        assert!(path.starts_with("logs"));
        assert!(LogSettings::from_values(None, None).file_path("x").is_none());
    }
}
