//! # Scan Target Model
//!
//! Defines the endpoints whose certificates are checked.
//!
//! A target is written as:
//! * `host`, using the default TLS port (443).
//! * `host:port`, split on the **last** colon.
//! * `[ipv6]` or `[ipv6]:port`.
//! * A bare IPv6 address. The last-colon split still applies when the part
//!   before it is a host (`::1:443` is `::1` on port 443). Only when that
//!   split fails is the whole address the host, on the default port. Use
//!   brackets to avoid the ambiguity.
//!
//! Target lists are comma or newline separated. Invalid entries are skipped
//! with a warning; they never abort the scan on their own.

use std::collections::HashSet;
use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;

use tracing::warn;

use crate::error::TargetParseError;

pub const DEFAULT_PORT: u16 = 443;

/// One endpoint to probe.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Target {
    host: String,
    port: u16,
}

impl Target {
    /// Builds a target from an already split host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, TargetParseError> {
        let host: String = host.into();
        let entry = format!("{host}:{port}");
        build(&entry, &host, port)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for Target {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entry = s.trim();

        if let Some(target) = parse_bracketed(entry)? {
            return Ok(target);
        }

        let Some((host, port)) = entry.rsplit_once(':') else {
            return build(entry, entry, DEFAULT_PORT);
        };

        // A host left of the last colon is either colon-free or a full IPv6 address.
        let split = if host.contains(':') && host.parse::<Ipv6Addr>().is_err() {
            Err(TargetParseError::Malformed {
                entry: entry.to_string(),
            })
        } else {
            parse_port(entry, port)
        };

        match split {
            Ok(port) => build(entry, host, port),
            Err(_) if entry.parse::<Ipv6Addr>().is_ok() => build(entry, entry, DEFAULT_PORT),
            Err(e) => Err(e),
        }
    }
}

/// Outcome of parsing a whole target list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TargetList {
    /// Unique targets, in the order they first appeared.
    pub targets: Vec<Target>,
    /// Entries that could not be parsed.
    pub rejected: Vec<TargetParseError>,
    /// Targets that appeared more than once and were dropped.
    pub duplicates: Vec<Target>,
}

/// Parses a comma or newline separated list (e.g. `"a.com, b.com:8443"`).
///
/// Blank entries and lines starting with `#` are ignored.
pub fn parse_target_list(raw: &str) -> TargetList {
    let mut list = TargetList::default();
    let mut seen: HashSet<Target> = HashSet::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }

        for part in line.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            match part.parse::<Target>() {
                Ok(target) if seen.contains(&target) => {
                    warn!("Skipping duplicate target {target}");
                    list.duplicates.push(target);
                }
                Ok(target) => {
                    seen.insert(target.clone());
                    list.targets.push(target);
                }
                Err(e) => {
                    warn!("Skipping target entry: {e}");
                    list.rejected.push(e);
                }
            }
        }
    }

    list
}

fn build(entry: &str, host: &str, port: u16) -> Result<Target, TargetParseError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(TargetParseError::EmptyHost {
            entry: entry.to_string(),
        });
    }
    if port == 0 {
        return Err(TargetParseError::InvalidPort {
            entry: entry.to_string(),
            port: port.to_string(),
        });
    }

    Ok(Target {
        host: host.to_string(),
        port,
    })
}

/// Parses `[addr]` and `[addr]:port`. Returns `None` when the entry is not bracketed.
fn parse_bracketed(entry: &str) -> Result<Option<Target>, TargetParseError> {
    let Some(rest) = entry.strip_prefix('[') else {
        return Ok(None);
    };

    let malformed = || TargetParseError::Malformed {
        entry: entry.to_string(),
    };

    let (host, tail) = rest.split_once(']').ok_or_else(malformed)?;
    let port: u16 = match tail {
        "" => DEFAULT_PORT,
        _ => {
            let port_str = tail.strip_prefix(':').ok_or_else(malformed)?;
            parse_port(entry, port_str)?
        }
    };

    build(entry, host, port).map(Some)
}

fn parse_port(entry: &str, port: &str) -> Result<u16, TargetParseError> {
    match port.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(TargetParseError::InvalidPort {
            entry: entry.to_string(),
            port: port.to_string(),
        }),
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
