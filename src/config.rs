//! A minimal config file format for gap buffers
use crate::{
    buffer::{DEFAULT_CAPACITY, DEFAULT_GAP_MARKER},
    CONFIG_PATH_ENV_VAR,
};
use std::{env, fs, io, path::Path};

/// Settings used when constructing a [GapBuffer](crate::GapBuffer) via
/// [with_config](crate::GapBuffer::with_config).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of usable units allocated up front.
    pub initial_capacity: usize,
    /// Marker rendered for each unit of the gap by
    /// [render_debug](crate::GapBuffer::render_debug).
    pub gap_marker: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            gap_marker: DEFAULT_GAP_MARKER.to_string(),
        }
    }
}

impl Config {
    /// Load the config file pointed to by the `GAPBUF_CONFIG` environment variable, falling
    /// back to the default config if the variable is unset.
    pub fn try_load() -> Result<Self, String> {
        match env::var(CONFIG_PATH_ENV_VAR) {
            Ok(path) => Self::try_load_from(path),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load and parse the config file at `path`. A missing file is not an error and results in
    /// the default config.
    pub fn try_load_from(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let s = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("Unable to load config: {e}")),
        };

        match Self::parse(&s) {
            Ok(cfg) => Ok(cfg),
            Err(e) => Err(format!("Invalid config file {}: {e}", path.display())),
        }
    }

    /// Attempt to parse the given file content as a Config file.
    /// If the file is invalid then an error message describing the first bad line is returned.
    ///
    /// Values may be wrapped in double quotes in order to preserve surrounding whitespace.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let mut cfg = Config::default();

        for line in contents.lines() {
            let line = line.trim_end();
            if line.starts_with('#') || line.is_empty() {
                continue;
            }

            let line = match line.strip_prefix("set ") {
                None => return Err(format!("'{line}' is not a 'set prop=val' command")),
                Some(line) => line,
            };

            let (prop, val) = match line.split_once('=') {
                None => return Err(format!("'{line}' is not a 'set prop=val' command")),
                Some(parts) => parts,
            };

            let val = val
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(val);

            match prop {
                "initial-capacity" => {
                    cfg.initial_capacity = match val.parse() {
                        Ok(num) => num,
                        Err(_) => return Err(format!("'{val}' is not a valid initial-capacity")),
                    };
                }

                "gap-marker" => {
                    if val.is_empty() {
                        return Err("gap-marker must not be empty".to_string());
                    }
                    cfg.gap_marker = val.to_string();
                }

                _ => return Err(format!("'{prop}' is not a known config property")),
            }
        }

        Ok(cfg)
    }
}
