//! Named, priority-ordered collections of dashboard widgets.
//!
//! A [`DashboardEntries`] keeps at most one entry per name. Inserting marks
//! the collection unsorted; the next ordered read sorts it by ascending
//! priority (stable, so equal priorities keep their relative order).
use std::fmt;

use crate::dashboard::error::DashboardError;
use crate::kernel::error::Result;

/// Something that can live in a [`DashboardEntries`] collection
pub trait DashboardEntry: Clone {
    fn name(&self) -> &str;

    /// Display title; defaults to the name
    fn title(&self) -> &str {
        self.name()
    }

    fn priority(&self) -> i64;

    fn set_priority(&mut self, priority: i64);

    fn is_disabled(&self) -> bool {
        false
    }

    /// Take over the scalar fields of `other`. Children are kept.
    fn merge_from(&mut self, other: &Self);
}

/// The kinds of containers holding dashboard entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Holds homes
    Dashboard,
    /// Holds panes
    Home,
    /// Holds dashlets
    Pane,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerKind::Dashboard => write!(f, "dashboard"),
            ContainerKind::Home => write!(f, "home"),
            ContainerKind::Pane => write!(f, "pane"),
        }
    }
}

/// The container an entry is moved out of
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub kind: ContainerKind,
    pub name: String,
}

impl Origin {
    pub fn new(kind: ContainerKind, name: impl Into<String>) -> Self {
        Self { kind, name: name.into() }
    }
}

/// Named entries, sorted by priority on demand
#[derive(Debug, Clone)]
pub struct DashboardEntries<E> {
    entries: Vec<E>,
    needs_sort: bool,
}

impl<E> Default for DashboardEntries<E> {
    fn default() -> Self {
        Self { entries: Vec::new(), needs_sort: false }
    }
}

impl<E: DashboardEntry> DashboardEntries<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_entry(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name() == name)
    }

    /// The named entry; asking for an unknown one is a programming error
    pub fn get_entry(&self, name: &str) -> Result<&E> {
        self.entries
            .iter()
            .find(|e| e.name() == name)
            .ok_or_else(|| DashboardError::UnknownEntry(name.to_string()).into())
    }

    pub fn get_entry_mut(&mut self, name: &str) -> Result<&mut E> {
        self.entries
            .iter_mut()
            .find(|e| e.name() == name)
            .ok_or_else(|| DashboardError::UnknownEntry(name.to_string()).into())
    }

    /// All entries ordered by priority
    pub fn entries(&mut self) -> &[E] {
        if self.needs_sort {
            self.needs_sort = false;
            self.entries.sort_by_key(|e| e.priority());
        }
        &self.entries
    }

    /// Entries in their current stored order, without sorting
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.entries.iter()
    }

    /// Replace all entries. Of several entries with the same name the last one is kept.
    pub fn set_entries(&mut self, entries: Vec<E>) -> &mut Self {
        self.entries.clear();
        for entry in entries {
            match self.position(entry.name()) {
                Some(index) => self.entries[index] = entry,
                None => self.entries.push(entry),
            }
        }
        self.needs_sort = true;
        self
    }

    /// Add an entry. An entry of the same name takes over the new entry's fields.
    pub fn add_entry(&mut self, entry: E) -> &mut Self {
        match self.position(entry.name()) {
            Some(index) => self.entries[index].merge_from(&entry),
            None => self.entries.push(entry),
        }
        self.needs_sort = true;
        self
    }

    /// Add an entry or replace an existing one of the same name entirely
    pub fn put_entry(&mut self, entry: E) -> &mut Self {
        match self.position(entry.name()) {
            Some(index) => self.entries[index] = entry,
            None => self.entries.push(entry),
        }
        self.needs_sort = true;
        self
    }

    /// Name and title of every entry, ordered by priority
    pub fn entry_key_title_map(&mut self) -> Vec<(String, String)> {
        self.entries()
            .iter()
            .map(|e| (e.name().to_string(), e.title().to_string()))
            .collect()
    }

    pub fn remove_entry(&mut self, name: &str) -> Option<E> {
        let index = self.position(name)?;
        Some(self.entries.remove(index))
    }

    /// Remove the named entries, or all entries if `names` is empty
    pub fn remove_entries(&mut self, names: &[&str]) -> &mut Self {
        if names.is_empty() {
            self.entries.clear();
        } else {
            self.entries.retain(|e| !names.contains(&e.name()));
        }
        self
    }

    /// The first entry in stored order, optionally skipping disabled ones
    pub fn first(&self, skip_disabled: bool) -> Option<&E> {
        self.entries.iter().find(|e| !(skip_disabled && e.is_disabled()))
    }

    fn set_priority_of(&mut self, name: &str, priority: i64) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.name() == name) {
            entry.set_priority(priority);
            self.needs_sort = true;
        }
    }
}

/// A widget that holds a [`DashboardEntries`] collection and can persist its entries
pub trait Sortable {
    type Entry: DashboardEntry;

    fn kind(&self) -> ContainerKind;

    fn entries(&self) -> &DashboardEntries<Self::Entry>;

    fn entries_mut(&mut self) -> &mut DashboardEntries<Self::Entry>;

    /// Persist an entry. `origin` is set when the entry is moved in from another container.
    fn manage_entry(&mut self, entry: Self::Entry, origin: Option<&Origin>) -> Result<()>;

    /// The first entry; dashboards skip disabled homes
    fn rewind_entries(&self) -> Option<&Self::Entry> {
        self.entries().first(self.kind() == ContainerKind::Dashboard)
    }

    /// Move `entry` to `position` and renumber priorities.
    ///
    /// An entry not in this container only gets `position` as priority. An
    /// entry already present is moved (positions past the end append) and
    /// every entry gets its index as priority, unless it is the only one.
    /// Each affected entry is handed to [`Sortable::manage_entry`]; only the
    /// moved entry carries `origin`.
    fn reorder_widget(&mut self, entry: Self::Entry, position: usize, origin: Option<&Origin>) -> Result<()> {
        if let Some(origin) = origin {
            if origin.kind != self.kind() {
                return Err(DashboardError::InvalidOrigin {
                    expected: self.kind(),
                    actual: origin.kind,
                }
                .into());
            }
        }

        let moved = entry.name().to_string();
        let data = if self.entries().has_entry(&moved) {
            let mut data: Vec<Self::Entry> = self
                .entries_mut()
                .entries()
                .iter()
                .filter(|e| e.name() != moved)
                .cloned()
                .collect();
            let position = position.min(data.len());
            data.insert(position, entry);
            data
        } else {
            let mut entry = entry;
            entry.set_priority(i64::try_from(position).unwrap_or(i64::MAX));
            vec![entry]
        };

        let renumber = data.len() != 1;
        for (index, mut item) in data.into_iter().enumerate() {
            if renumber {
                let priority = i64::try_from(index).unwrap_or(i64::MAX);
                item.set_priority(priority);
                self.entries_mut().set_priority_of(item.name(), priority);
            }

            let item_origin = if item.name() == moved { origin } else { None };
            self.manage_entry(item, item_origin)?;
        }

        Ok(())
    }
}
