use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use semver::{Comparator, Op, Version, VersionReq};
use thiserror::Error;

/// Error type for version parsing
#[derive(Debug, Error, PartialEq)]
pub enum VersionError {
    #[error("Invalid version format: '{0}'")]
    InvalidFormat(String),
    #[error("Version parse error: {0}")]
    ParseError(String),
}

/// Minimum module versions that ship Icinga DB support next to the legacy
/// `monitoring` backend
pub const ICINGADB_SUPPORTING_MODULES: &[(&str, &str)] = &[
    ("cube", "1.2.0"),
    ("jira", "1.2.0"),
    ("graphite", "1.2.0"),
    ("director", "1.9.0"),
    ("toplevelview", "0.4.0"),
    ("businessprocess", "2.4.0"),
];

/// A module version as written in a descriptor.
///
/// Descriptors use loose dotted versions ("1", "2.4", "v1.2.3", "1.0.0-rc1").
/// Missing components are treated as zero, so "2.4" equals "2.4.0".
/// Components past the patch level ("1.9.0.1") order after the patch level.
#[derive(Debug, Clone)]
pub struct ModuleVersion {
    raw: String,
    version: Version,
    extra: Vec<u64>,
}

impl ModuleVersion {
    /// Parse a loose dotted version
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let (normalized, extra) = normalize(raw)?;
        let version = Version::parse(&normalized)
            .map_err(|e| VersionError::ParseError(format!("'{}': {}", raw, e)))?;
        Ok(Self {
            raw: raw.to_string(),
            version,
            extra,
        })
    }

    /// The string this version was parsed from
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The normalized semantic version
    pub fn semver(&self) -> &Version {
        &self.version
    }
}

impl PartialEq for ModuleVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ModuleVersion {}

impl PartialOrd for ModuleVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModuleVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (&self.version, &other.version);
        (a.major, a.minor, a.patch)
            .cmp(&(b.major, b.minor, b.patch))
            .then_with(|| compare_extra(&self.extra, &other.extra))
            .then_with(|| a.pre.cmp(&b.pre))
    }
}

impl FromStr for ModuleVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleVersion::parse(s)
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Bring a loose version into `major.minor.patch[-pre]` form, returning the
/// components past the patch level separately
fn normalize(raw: &str) -> Result<(String, Vec<u64>), VersionError> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    let (core, pre) = match trimmed.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (trimmed, None),
    };

    let mut parts: Vec<&str> = core.split('.').collect();
    if parts.iter().any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit())) {
        return Err(VersionError::InvalidFormat(raw.to_string()));
    }
    let extra = if parts.len() > 3 {
        parts
            .split_off(3)
            .into_iter()
            .map(|p| p.parse::<u64>().map_err(|e| VersionError::ParseError(format!("'{}': {}", raw, e))))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        Vec::new()
    };
    while parts.len() < 3 {
        parts.push("0");
    }

    let mut normalized = parts.join(".");
    if let Some(pre) = pre {
        normalized.push('-');
        normalized.push_str(pre);
    }
    Ok((normalized, extra))
}

/// Missing trailing components count as zero
fn compare_extra(a: &[u64], b: &[u64]) -> Ordering {
    (0..a.len().max(b.len()))
        .map(|i| a.get(i).copied().unwrap_or(0).cmp(&b.get(i).copied().unwrap_or(0)))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Whether `version` is at least `minimum`. Unparsable versions never are.
pub fn version_at_least(version: &str, minimum: &str) -> bool {
    match (ModuleVersion::parse(version), ModuleVersion::parse(minimum)) {
        (Ok(version), Ok(minimum)) => version >= minimum,
        _ => false,
    }
}

/// Whether the named module, in the given version, supports Icinga DB
pub fn supports_icingadb(module: &str, version: &str) -> bool {
    ICINGADB_SUPPORTING_MODULES
        .iter()
        .find(|(name, _)| *name == module)
        .is_some_and(|(_, minimum)| version_at_least(version, minimum))
}

/// Represents a version requirement range using semver constraints.
///
/// Constraints follow descriptor conventions: a bare version ("1.2") means
/// "at least this version", operators (`>=`, `<`, `=`, `~`, `^`) keep their
/// semver meaning and may be comma separated.
#[derive(Debug, Clone)]
pub struct VersionRange {
    /// The original constraint string (e.g., ">=1.2.3", "2.0")
    constraint: String,
    /// The parsed semver requirement
    req: VersionReq,
}

impl VersionRange {
    /// Creates a new version range from a constraint string.
    pub fn from_constraint(constraint: &str) -> Result<Self, VersionError> {
        let mut comparators = Vec::new();
        for part in constraint.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let split_at = part
                .find(|c: char| c.is_ascii_digit() || c == 'v')
                .ok_or_else(|| VersionError::InvalidFormat(constraint.to_string()))?;
            let (op, version) = part.split_at(split_at);
            let op = match op.trim() {
                "" | ">=" => Op::GreaterEq,
                ">" => Op::Greater,
                "<=" => Op::LessEq,
                "<" => Op::Less,
                "=" | "==" => Op::Exact,
                "~" => Op::Tilde,
                "^" => Op::Caret,
                other => {
                    return Err(VersionError::ParseError(format!(
                        "Invalid version constraint '{}': unknown operator '{}'",
                        constraint, other
                    )));
                }
            };
            let version = ModuleVersion::parse(version)?;
            let v = version.semver();
            comparators.push(Comparator {
                op,
                major: v.major,
                minor: Some(v.minor),
                patch: Some(v.patch),
                pre: v.pre.clone(),
            });
        }

        if comparators.is_empty() {
            return Err(VersionError::InvalidFormat(constraint.to_string()));
        }

        Ok(Self {
            constraint: constraint.to_string(),
            req: VersionReq { comparators },
        })
    }

    /// Checks if a module version satisfies this range.
    pub fn includes(&self, version: &ModuleVersion) -> bool {
        self.req.matches(version.semver())
    }
}

/// Implement Display to show the original constraint string.
impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.constraint)
    }
}

impl FromStr for VersionRange {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionRange::from_constraint(s)
    }
}
