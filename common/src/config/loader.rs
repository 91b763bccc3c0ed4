//! # Configuration Loader
//!
//! Builds an [`AppConfig`] from, lowest priority first:
//! 1. an INI file (`config.ini` by default, optional unless given explicitly),
//! 2. environment variables,
//! 3. command line [`Overrides`].
//!
//! ```ini
//! [bark]
//! device_key = xxxxxxxx
//! base_url = https://api.day.app
//!
//! [ssl_checks]
//! domains = example.com, api.example.com:8443
//! warning_days = 30
//! ```
//!
//! Indented lines continue the entry above them, so `domains` may also list
//! one target per line.

use std::fmt::Display;
use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ::config::{Config, File, FileFormat};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{
    AppConfig, DEFAULT_BASE_URL, DEFAULT_ICON, DEFAULT_TIMEOUT, DEFAULT_WARNING_DAYS,
    DEFAULT_WORKERS, FailurePolicy, PushConfig, ScanStrategy,
};
use crate::error::ConfigError;
use crate::network::target::parse_target_list;

pub const DEFAULT_CONFIG_FILE: &str = "config.ini";

/// Environment variables and the configuration keys they override.
const ENV_KEYS: &[(&str, &str)] = &[
    ("BARK_KEY", "bark.device_key"),
    ("BARK_URL", "bark.base_url"),
    ("BARK_ICON", "bark.icon"),
    ("DOMAINS", "ssl_checks.domains"),
    ("DAYS_THRESHOLD", "ssl_checks.warning_days"),
    ("CERTWATCH_TIMEOUT_SECS", "ssl_checks.timeout_secs"),
    ("CERTWATCH_WORKERS", "ssl_checks.workers"),
    ("CERTWATCH_FAILURE_POLICY", "ssl_checks.failure_policy"),
];

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// Settings given on the command line. They win over every other source.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub workers: Option<NonZeroUsize>,
    pub sequential: bool,
    pub failure_policy: Option<FailurePolicy>,
    /// Run without a device key; every notification is skipped.
    pub no_push: bool,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    bark: RawBark,
    #[serde(default)]
    ssl_checks: RawChecks,
}

#[derive(Debug, Default, Deserialize)]
struct RawBark {
    device_key: Option<String>,
    base_url: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawChecks {
    domains: Option<String>,
    warning_days: Option<String>,
    timeout_secs: Option<String>,
    workers: Option<String>,
    failure_policy: Option<String>,
}

pub struct ConfigLoader {
    file: Option<PathBuf>,
    file_required: bool,
    env: EnvLookup,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Reads `config.ini` from the working directory if present, plus the process environment.
    pub fn new() -> Self {
        Self {
            file: Some(PathBuf::from(DEFAULT_CONFIG_FILE)),
            file_required: false,
            env: Box::new(|name| std::env::var(name).ok()),
        }
    }

    /// Uses `path` instead of the default file. The file must exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self.file_required = true;
        self
    }

    pub fn without_file(mut self) -> Self {
        self.file = None;
        self
    }

    /// Replaces the environment lookup.
    pub fn with_env<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        self.env = Box::new(env);
        self
    }

    pub fn load(&self, overrides: &Overrides) -> Result<AppConfig, ConfigError> {
        let mut builder = Config::builder();

        if let Some(text) = self.read_file()? {
            builder = builder.add_source(File::from_str(&text, FileFormat::Ini));
        }

        for (var, key) in ENV_KEYS {
            let value = (self.env)(var).filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        let raw: RawConfig = builder.build()?.try_deserialize()?;
        resolve(raw, overrides)
    }

    /// Contents of the INI file with continuation lines folded in, or `None`
    /// when an optional file is absent.
    fn read_file(&self) -> Result<Option<String>, ConfigError> {
        let Some(path) = &self.file else {
            return Ok(None);
        };

        debug!("Reading configuration file {}", path.display());
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(join_continuation_lines(&text))),
            Err(e) if e.kind() == io::ErrorKind::NotFound && !self.file_required => {
                debug!("No configuration file at {}", path.display());
                Ok(None)
            }
            Err(source) => Err(ConfigError::File {
                path: path.display().to_string(),
                source,
            }),
        }
    }
}

/// Folds indented lines into the `key = value` entry above them, comma separated,
/// so a value can list one item per line:
///
/// ```ini
/// domains =
///     example.com
///     api.example.com:8443
/// ```
fn join_continuation_lines(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut in_entry = false;

    for line in text.lines() {
        let trimmed = line.trim();

        if in_entry && line.starts_with([' ', '\t']) && !trimmed.is_empty() {
            if trimmed.starts_with([';', '#']) {
                continue;
            }
            if let Some(entry) = lines.last_mut() {
                let separator = if entry.trim_end().ends_with('=') { " " } else { ", " };
                entry.push_str(separator);
                entry.push_str(trimmed);
            }
            continue;
        }

        in_entry = trimmed.contains('=') && !trimmed.starts_with(['[', ';', '#']);
        lines.push(line.to_string());
    }

    lines.join("\n")
}

fn resolve(raw: RawConfig, overrides: &Overrides) -> Result<AppConfig, ConfigError> {
    let device_key = non_empty(raw.bark.device_key);
    if device_key.is_none() && !overrides.no_push {
        return Err(ConfigError::Missing(
            "push device key (set BARK_KEY or [bark] device_key)".to_string(),
        ));
    }

    let push = PushConfig {
        device_key: if overrides.no_push { None } else { device_key },
        base_url: resolve_base_url(raw.bark.base_url)?,
        icon: match raw.bark.icon {
            None => Some(DEFAULT_ICON.to_string()),
            Some(icon) => non_empty(Some(icon)),
        },
    };

    let domains = non_empty(raw.ssl_checks.domains).ok_or_else(|| {
        ConfigError::Missing("target list (set DOMAINS or [ssl_checks] domains)".to_string())
    })?;
    let targets = parse_target_list(&domains).targets;
    if targets.is_empty() {
        return Err(ConfigError::Missing(
            "no valid target in the target list".to_string(),
        ));
    }

    let warning_days: u32 = parse_setting(
        "ssl_checks.warning_days",
        raw.ssl_checks.warning_days,
        DEFAULT_WARNING_DAYS,
    )?;

    let timeout_secs: u64 = parse_setting(
        "ssl_checks.timeout_secs",
        raw.ssl_checks.timeout_secs,
        DEFAULT_TIMEOUT.as_secs(),
    )?;
    if timeout_secs == 0 {
        return Err(invalid("ssl_checks.timeout_secs", "0", "must be at least 1"));
    }

    let failure_policy = match overrides.failure_policy {
        Some(policy) => policy,
        None => parse_setting(
            "ssl_checks.failure_policy",
            raw.ssl_checks.failure_policy,
            FailurePolicy::default(),
        )?,
    };

    let strategy = if overrides.sequential {
        ScanStrategy::Sequential
    } else {
        let workers = match overrides.workers {
            Some(workers) => workers,
            None => parse_setting::<NonZeroUsize>(
                "ssl_checks.workers",
                raw.ssl_checks.workers,
                NonZeroUsize::new(DEFAULT_WORKERS).unwrap_or(NonZeroUsize::MIN),
            )?,
        };
        match workers.get() {
            1 => ScanStrategy::Sequential,
            _ => ScanStrategy::Parallel { workers },
        }
    };

    Ok(AppConfig {
        push,
        targets,
        warning_days,
        timeout: Duration::from_secs(timeout_secs),
        failure_policy,
        strategy,
    })
}

fn resolve_base_url(value: Option<String>) -> Result<String, ConfigError> {
    let Some(raw) = non_empty(value) else {
        return Ok(DEFAULT_BASE_URL.to_string());
    };

    let trimmed = raw.trim_end_matches('/').to_string();
    let url = Url::parse(&trimmed).map_err(|e| invalid("bark.base_url", &raw, e))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid("bark.base_url", &raw, "expected an http(s) URL"));
    }

    Ok(trimmed)
}

fn parse_setting<T>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match non_empty(value) {
        None => Ok(default),
        Some(raw) => raw.parse::<T>().map_err(|e| invalid(key, &raw, e)),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn invalid(key: &str, value: &str, reason: impl Display) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
