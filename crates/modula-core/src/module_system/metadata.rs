//! Module descriptor (`module.info`) parsing.
//!
//! A descriptor is a list of `Key: value` lines. The value of `Description`
//! doubles as the module title on its first occurrence; the long description
//! follows on lines indented by a single space:
//!
//! ```text
//! Name: graphs
//! Version: 1.2.0
//! Requires:
//!   Libraries: icinga-php-library (>=0.9.0)
//!   Modules: monitoring (>=2.9.0), icingadb
//! Description: Performance graphs
//!  Renders graphs for hosts and services.
//! ```
//!
//! Parsing never fails. Malformed input stops the scan with a debug message
//! and whatever was read up to that point is kept.
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::kernel::constants;
use crate::module_system::version::{ModuleVersion, VersionRange};

static KEY_VALUE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s+").expect("valid key/value separator pattern"));
static LIST_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s+").expect("valid list separator pattern"));
static NAME_WITH_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w\-/]+)\s+\((.+)\)$").expect("valid requirement pattern"));

/// A single requirement: any version, or a version constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Any version will do
    Any,
    /// The raw version constraint, e.g. `>=2.9.0`
    Version(String),
}

impl Requirement {
    /// The constraint string, if any
    pub fn constraint(&self) -> Option<&str> {
        match self {
            Requirement::Any => None,
            Requirement::Version(v) => Some(v),
        }
    }

    /// Whether the given installed version fulfils this requirement.
    /// Constraints that cannot be parsed are never fulfilled.
    pub fn is_satisfied_by(&self, version: &str) -> bool {
        match self {
            Requirement::Any => true,
            Requirement::Version(constraint) => {
                match (VersionRange::from_constraint(constraint), ModuleVersion::parse(version)) {
                    (Ok(range), Ok(version)) => range.includes(&version),
                    _ => false,
                }
            }
        }
    }
}

impl Serialize for Requirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Requirement::Any => serializer.serialize_bool(true),
            Requirement::Version(v) => serializer.serialize_str(v),
        }
    }
}

/// Requirements by name, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementMap {
    entries: Vec<(String, Requirement)>,
}

impl RequirementMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a requirement. A replaced entry keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, requirement: Requirement) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = requirement,
            None => self.entries.push((name, requirement)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Requirement> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Requirement> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Requirement)> {
        self.entries.iter().map(|(n, r)| (n.as_str(), r))
    }
}

impl<S: Into<String>> FromIterator<(S, Requirement)> for RequirementMap {
    fn from_iter<I: IntoIterator<Item = (S, Requirement)>>(iter: I) -> Self {
        let mut map = RequirementMap::new();
        for (name, requirement) in iter {
            map.insert(name, requirement);
        }
        map
    }
}

impl Serialize for RequirementMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, requirement) in &self.entries {
            map.serialize_entry(name, requirement)?;
        }
        map.end()
    }
}

/// Everything a module descriptor declares
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleMetadata {
    pub name: String,
    pub version: String,
    pub title: String,
    pub description: String,
    /// Legacy dependency list (`Depends:`)
    pub depends: RequirementMap,
    pub libraries: RequirementMap,
    pub modules: RequirementMap,
    /// Any other key, lower-cased, with its literal value
    pub extra: BTreeMap<String, String>,
}

impl ModuleMetadata {
    /// Metadata of a module without descriptor
    pub fn defaults(name: &str) -> Self {
        MetadataParser::new(name, Path::new(constants::METADATA_FILE)).finish()
    }

    /// Read the descriptor at `path`. A missing or unreadable file yields defaults.
    pub fn from_file(name: &str, path: &Path) -> Self {
        let mut parser = MetadataParser::new(name, path);
        if path.is_file() {
            match File::open(path) {
                Ok(file) => parser.feed(BufReader::new(file)),
                Err(e) => debug!("Can't read module descriptor {}: {}", path.display(), e),
            }
        }
        parser.finish()
    }

    /// Parse descriptor text
    pub fn parse_str(name: &str, content: &str) -> Self {
        let mut parser = MetadataParser::new(name, Path::new(constants::METADATA_FILE));
        parser.feed(content.as_bytes());
        parser.finish()
    }
}

/// Where the scanner is within the descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Expecting `Key: value` lines
    Scanning,
    /// Right after a `Description` line; indented and blank lines extend it
    InDescriptionContinuation,
}

/// Which requirement list a line contributes to
#[derive(Debug, Clone, Copy)]
enum RequirementList {
    Depends,
    Libraries,
    Modules,
}

/// Line-oriented descriptor parser
pub struct MetadataParser<'a> {
    source: &'a Path,
    /// The module's own name, used as the title fallback
    module: String,
    name: String,
    version: String,
    title: Option<String>,
    description: String,
    depends: RequirementMap,
    libraries: RequirementMap,
    modules: RequirementMap,
    extra: BTreeMap<String, String>,
    state: ParserState,
    simple_requires: bool,
}

impl<'a> MetadataParser<'a> {
    /// `source` is only used in diagnostics
    pub fn new(name: &str, source: &'a Path) -> Self {
        Self {
            source,
            module: name.to_string(),
            name: name.to_string(),
            version: constants::DEFAULT_MODULE_VERSION.to_string(),
            title: None,
            description: String::new(),
            depends: RequirementMap::new(),
            libraries: RequirementMap::new(),
            modules: RequirementMap::new(),
            extra: BTreeMap::new(),
            state: ParserState::Scanning,
            simple_requires: false,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Consume lines until the input ends or a line cannot be processed
    pub fn feed<R: BufRead>(&mut self, reader: R) {
        for (index, line) in reader.lines().enumerate() {
            let lineno = index + 1;
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    debug!("Can't read line {} in {}: {}", lineno, self.source.display(), e);
                    break;
                }
            };
            if !self.process_line(lineno, line.trim_end()) {
                break;
            }
        }
    }

    /// Returns false once scanning has to stop
    fn process_line(&mut self, lineno: usize, line: &str) -> bool {
        match self.state {
            ParserState::InDescriptionContinuation => {
                if line.is_empty() {
                    self.description.push('\n');
                    return true;
                }
                if let Some(content) = line.strip_prefix(' ') {
                    self.description.push_str(content);
                    return true;
                }
            }
            ParserState::Scanning => {
                if line.is_empty() {
                    return true;
                }
            }
        }

        if !line.contains(':') {
            debug!(
                "Can't process line {} in {}: Line does not specify a key:value pair \
                 nor is it part of the description (indented with a single space)",
                lineno,
                self.source.display()
            );
            return false;
        }

        // A line ending in a bare colon (`Requires:`) opens a block
        let (key, value) = match KEY_VALUE_SEPARATOR.find(line) {
            Some(m) => (&line[..m.start()], &line[m.end()..]),
            None => (line.strip_suffix(':').unwrap_or(line), ""),
        };
        let key = key.to_lowercase();
        self.state = if key == "description" {
            ParserState::InDescriptionContinuation
        } else {
            ParserState::Scanning
        };

        match key.as_str() {
            "requires" => {
                if !value.is_empty() {
                    self.simple_requires = true;
                    self.add_requirements(RequirementList::Libraries, value);
                }
            }
            "  libraries" | "  modules" => {
                if self.simple_requires {
                    debug!(
                        "Can't process line {} in {}: Requirements already registered by a previous line",
                        lineno,
                        self.source.display()
                    );
                } else if key == "  libraries" {
                    self.add_requirements(RequirementList::Libraries, value);
                } else {
                    self.add_requirements(RequirementList::Modules, value);
                }
            }
            "depends" => self.add_requirements(RequirementList::Depends, value),
            "description" => {
                if self.title.is_none() {
                    self.title = Some(value.to_string());
                } else {
                    self.description = value.to_string();
                }
            }
            "name" => self.name = value.to_string(),
            "version" => self.version = value.to_string(),
            "title" => self.title = Some(value.to_string()),
            _ => {
                self.extra.insert(key, value.to_string());
            }
        }

        true
    }

    fn add_requirements(&mut self, list: RequirementList, value: &str) {
        let target = match list {
            RequirementList::Depends => &mut self.depends,
            RequirementList::Libraries => &mut self.libraries,
            RequirementList::Modules => &mut self.modules,
        };

        if value.is_empty() {
            return;
        }
        if !value.contains(' ') {
            target.insert(value, Requirement::Any);
            return;
        }

        for part in LIST_SEPARATOR.split(value) {
            match NAME_WITH_VERSION.captures(part) {
                Some(caps) => target.insert(&caps[1], Requirement::Version(caps[2].to_string())),
                None => target.insert(part, Requirement::Any),
            }
        }
    }

    /// Apply defaults and produce the record
    pub fn finish(self) -> ModuleMetadata {
        let title = self.title.unwrap_or(self.module);
        let description = if self.description.is_empty() {
            constants::DEFAULT_MODULE_DESCRIPTION.to_string()
        } else {
            self.description
        };

        ModuleMetadata {
            name: self.name,
            version: self.version,
            title,
            description,
            depends: self.depends,
            libraries: self.libraries,
            modules: self.modules,
            extra: self.extra,
        }
    }
}
