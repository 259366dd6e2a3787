//! Server settings: defaults, then `train-booking.toml`, then environment

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use serde::Deserialize;
use train_booking_core::{is_truthy, Config, DuplicateReservePolicy, ReassignPolicy};

/// Name of the settings file looked up from the working directory upwards
const SETTINGS_FILE: &str = "train-booking.toml";

/// Settings of the server process
#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Settings {
    /// Address for the HTTP server to listen on
    pub host: String,
    /// Port for the HTTP server to listen on
    pub port: u16,
    /// Number of threads accepting HTTP requests
    pub worker_threads: u32,

    /// Run the registry on a single worker thread
    pub serial: bool,
    /// Refuse reservations for contacts that already hold a booking
    pub reject_duplicates: bool,
    /// Check seat, occupancy and capacity when reassigning
    pub validate_reassign: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8111,
            worker_threads: 64,
            serial: false,
            reject_duplicates: false,
            validate_reassign: false,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the nearest `train-booking.toml`
    ///
    /// An explicit `path` must exist. Without one, a missing file just means
    /// defaults. Environment overrides are applied on top in both cases.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let contents = match path {
            Some(path) => Some(
                std::fs::read_to_string(path)
                    .wrap_err_with(|| format!("could not read {}", path.display()))?,
            ),
            None => find_settings_file()?,
        };

        let mut settings = match contents {
            Some(contents) => Self::parse(&contents)?,
            None => Self::default(),
        };
        settings.apply_env();
        Ok(settings)
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).wrap_err("invalid settings file")
    }

    /// Apply `TRAIN_BOOKING_SERIAL` and `TRAIN_BOOKING_STRICT`
    fn apply_env(&mut self) {
        if let Some(v) = std::env::var_os("TRAIN_BOOKING_SERIAL") {
            self.serial = is_truthy(&v);
        }
        if let Some(v) = std::env::var_os("TRAIN_BOOKING_STRICT") {
            let strict = is_truthy(&v);
            self.reject_duplicates = strict;
            self.validate_reassign = strict;
        }
    }

    /// Configuration of the booking system
    pub fn config(&self) -> Config {
        Config {
            duplicate_reserve: if self.reject_duplicates {
                DuplicateReservePolicy::Reject
            } else {
                DuplicateReservePolicy::Overwrite
            },
            reassign: if self.validate_reassign {
                ReassignPolicy::Validated
            } else {
                ReassignPolicy::Unchecked
            },
            serial: self.serial,
        }
    }
}

/// Walk up from the working directory looking for [`SETTINGS_FILE`]
fn find_settings_file() -> Result<Option<String>> {
    let mut path: PathBuf = std::env::current_dir()?;
    loop {
        path.push(SETTINGS_FILE);

        match std::fs::read_to_string(&path) {
            Ok(s) => {
                tracing::info!(path = %path.display(), "using settings file");
                return Ok(Some(s));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e).wrap_err_with(|| format!("could not read {}", path.display())),
        }

        path.pop();
        if !path.pop() {
            return Ok(None);
        }
    }
}
