use std::thread;

use crate::error::{ArchivistError, Result};
use crate::locate::MAX_FETCH_PARALLELISM;
use crate::mediawiki::DEFAULT_MAX_CONTINUATIONS;

mod env;

pub const ENV_PAGE: &str = "ARCHIVIST_PAGE";
pub const ENV_ARCHIVER: &str = "ARCHIVIST_ARCHIVER";
pub const ENV_ARCHIVAL_WINDOW_HOURS: &str = "ARCHIVIST_ARCHIVAL_WINDOW_HOURS";
pub const ENV_CREATION_WINDOW_HOURS: &str = "ARCHIVIST_CREATION_WINDOW_HOURS";
pub const ENV_MAX_CONTINUATIONS: &str = "ARCHIVIST_MAX_CONTINUATIONS";
pub const ENV_FETCH_PARALLELISM: &str = "ARCHIVIST_FETCH_PARALLELISM";
pub const ENV_BOT_NAME: &str = "ARCHIVIST_BOT_NAME";

pub const DEFAULT_PAGE: &str = "Wikipedia:Teahouse";
pub const DEFAULT_ARCHIVER: &str = "Lowercase sigmabot III";
pub const DEFAULT_BOT_NAME: &str = "Muninnbot";
pub const DEFAULT_ARCHIVAL_WINDOW_HOURS: u64 = 24;
pub const DEFAULT_CREATION_WINDOW_HOURS: u64 = 240;
const MAX_WINDOW_HOURS: u64 = 366 * 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub page: String,
    pub archiver: String,
    pub archival_window_hours: u64,
    pub creation_window_hours: u64,
    pub max_continuations: usize,
    pub fetch_parallelism: usize,
    pub bot_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE.to_string(),
            archiver: DEFAULT_ARCHIVER.to_string(),
            archival_window_hours: DEFAULT_ARCHIVAL_WINDOW_HOURS,
            creation_window_hours: DEFAULT_CREATION_WINDOW_HOURS,
            max_continuations: DEFAULT_MAX_CONTINUATIONS,
            fetch_parallelism: default_fetch_parallelism(),
            bot_name: DEFAULT_BOT_NAME.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<L>(lookup: L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            page: env::read_non_empty(&lookup, ENV_PAGE).unwrap_or(defaults.page),
            archiver: env::read_non_empty(&lookup, ENV_ARCHIVER).unwrap_or(defaults.archiver),
            archival_window_hours: env::read_u64(&lookup, ENV_ARCHIVAL_WINDOW_HOURS)?
                .unwrap_or(defaults.archival_window_hours),
            creation_window_hours: env::read_u64(&lookup, ENV_CREATION_WINDOW_HOURS)?
                .unwrap_or(defaults.creation_window_hours),
            max_continuations: env::read_usize(&lookup, ENV_MAX_CONTINUATIONS)?
                .unwrap_or(defaults.max_continuations),
            fetch_parallelism: env::read_usize(&lookup, ENV_FETCH_PARALLELISM)?
                .unwrap_or(defaults.fetch_parallelism),
            bot_name: env::read_non_empty(&lookup, ENV_BOT_NAME).unwrap_or(defaults.bot_name),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("page", &self.page),
            ("archiver", &self.archiver),
            ("bot name", &self.bot_name),
        ] {
            if value.trim().is_empty() {
                return Err(ArchivistError::Validation(format!("{name} must not be empty")));
            }
        }
        for (name, hours) in [
            ("archival window", self.archival_window_hours),
            ("creation window", self.creation_window_hours),
        ] {
            if !(1..=MAX_WINDOW_HOURS).contains(&hours) {
                return Err(ArchivistError::Validation(format!(
                    "{name} must be between 1 and {MAX_WINDOW_HOURS} hours, got {hours}"
                )));
            }
        }
        if self.fetch_parallelism == 0 {
            return Err(ArchivistError::Validation(
                "fetch parallelism must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_fetch_parallelism() -> usize {
    thread::available_parallelism()
        .map_or(1, usize::from)
        .min(MAX_FETCH_PARALLELISM)
}
