use log::debug;
use serde::Serialize;

use crate::dashboard::entries::{ContainerKind, DashboardEntries, DashboardEntry, Origin, Sortable};
use crate::kernel::error::Result;
use crate::module_system::provides::{DashboardContainer, DashletContainer};

/// A single dashlet: a titled URL shown inside a pane
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashlet {
    name: String,
    title: String,
    url: String,
    priority: i64,
    description: Option<String>,
    pane: Option<String>,
}

impl Dashlet {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            url: url.into(),
            priority: 0,
            description: None,
            pane: None,
        }
    }

    /// A dashlet from one a module provides
    pub fn from_container(container: &DashletContainer) -> Self {
        let mut dashlet = Self::new(container.name(), container.url()).with_title(container.title());
        dashlet.description = container.description().map(str::to_string);
        dashlet
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The pane this dashlet was last managed by
    pub fn pane(&self) -> Option<&str> {
        self.pane.as_deref()
    }
}

impl DashboardEntry for Dashlet {
    fn name(&self) -> &str {
        &self.name
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn priority(&self) -> i64 {
        self.priority
    }

    fn set_priority(&mut self, priority: i64) {
        self.priority = priority;
    }

    fn merge_from(&mut self, other: &Self) {
        self.title.clone_from(&other.title);
        self.url.clone_from(&other.url);
        self.priority = other.priority;
        self.description.clone_from(&other.description);
        self.pane.clone_from(&other.pane);
    }
}

/// A pane groups dashlets
#[derive(Debug, Clone)]
pub struct Pane {
    name: String,
    title: String,
    priority: i64,
    disabled: bool,
    home: Option<String>,
    dashlets: DashboardEntries<Dashlet>,
}

impl Pane {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            priority: 0,
            disabled: false,
            home: None,
            dashlets: DashboardEntries::new(),
        }
    }

    /// A pane from one a module provides. Dashlets without a priority are
    /// ordered as they were provided.
    pub fn from_container(container: &DashboardContainer) -> Self {
        let mut pane = Self::new(container.name());
        if let Some(title) = container.properties().get("title").and_then(|v| v.as_str()) {
            pane.title = title.to_string();
        }
        if let Some(priority) = container.properties().get("priority").and_then(|v| v.as_i64()) {
            pane.priority = priority;
        }

        for (index, provided) in container.dashlets().iter().enumerate() {
            let priority = provided
                .priority
                .unwrap_or_else(|| i64::try_from(index).unwrap_or(i64::MAX));
            let mut dashlet = Dashlet::new(&provided.name, &provided.url).with_priority(priority);
            dashlet.pane = Some(pane.name.clone());
            pane.dashlets.add_entry(dashlet);
        }
        pane
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn set_disabled(&mut self, disabled: bool) -> &mut Self {
        self.disabled = disabled;
        self
    }

    pub fn home(&self) -> Option<&str> {
        self.home.as_deref()
    }

    pub fn dashlets(&mut self) -> &[Dashlet] {
        self.dashlets.entries()
    }
}

impl DashboardEntry for Pane {
    fn name(&self) -> &str {
        &self.name
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn priority(&self) -> i64 {
        self.priority
    }

    fn set_priority(&mut self, priority: i64) {
        self.priority = priority;
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn merge_from(&mut self, other: &Self) {
        self.title.clone_from(&other.title);
        self.priority = other.priority;
        self.disabled = other.disabled;
        self.home.clone_from(&other.home);
    }
}

impl Sortable for Pane {
    type Entry = Dashlet;

    fn kind(&self) -> ContainerKind {
        ContainerKind::Pane
    }

    fn entries(&self) -> &DashboardEntries<Dashlet> {
        &self.dashlets
    }

    fn entries_mut(&mut self) -> &mut DashboardEntries<Dashlet> {
        &mut self.dashlets
    }

    fn manage_entry(&mut self, mut entry: Dashlet, origin: Option<&Origin>) -> Result<()> {
        if let Some(origin) = origin {
            debug!("Moving dashlet {} from pane {} to {}", entry.name, origin.name, self.name);
        }
        entry.pane = Some(self.name.clone());
        self.dashlets.put_entry(entry);
        Ok(())
    }
}

/// A dashboard home groups panes
#[derive(Debug, Clone)]
pub struct DashboardHome {
    name: String,
    title: String,
    priority: i64,
    disabled: bool,
    panes: DashboardEntries<Pane>,
}

impl DashboardHome {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            priority: 0,
            disabled: false,
            panes: DashboardEntries::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn set_disabled(&mut self, disabled: bool) -> &mut Self {
        self.disabled = disabled;
        self
    }

    pub fn panes(&mut self) -> &[Pane] {
        self.panes.entries()
    }

    pub fn pane_mut(&mut self, name: &str) -> Result<&mut Pane> {
        self.panes.get_entry_mut(name)
    }
}

impl DashboardEntry for DashboardHome {
    fn name(&self) -> &str {
        &self.name
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn priority(&self) -> i64 {
        self.priority
    }

    fn set_priority(&mut self, priority: i64) {
        self.priority = priority;
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn merge_from(&mut self, other: &Self) {
        self.title.clone_from(&other.title);
        self.priority = other.priority;
        self.disabled = other.disabled;
    }
}

impl Sortable for DashboardHome {
    type Entry = Pane;

    fn kind(&self) -> ContainerKind {
        ContainerKind::Home
    }

    fn entries(&self) -> &DashboardEntries<Pane> {
        &self.panes
    }

    fn entries_mut(&mut self) -> &mut DashboardEntries<Pane> {
        &mut self.panes
    }

    fn manage_entry(&mut self, mut entry: Pane, origin: Option<&Origin>) -> Result<()> {
        if let Some(origin) = origin {
            debug!("Moving pane {} from home {} to {}", entry.name, origin.name, self.name);
        }
        entry.home = Some(self.name.clone());

        // Keep the dashlets a pane already has here when the entry comes without any
        if !entry.dashlets.has_entries() && self.panes.has_entry(&entry.name) {
            self.panes.get_entry_mut(&entry.name)?.merge_from(&entry);
        } else {
            self.panes.put_entry(entry);
        }
        Ok(())
    }
}

/// The top level container of all homes
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    homes: DashboardEntries<DashboardHome>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn homes(&mut self) -> &[DashboardHome] {
        self.homes.entries()
    }

    pub fn home_mut(&mut self, name: &str) -> Result<&mut DashboardHome> {
        self.homes.get_entry_mut(name)
    }

    /// The home shown first: the first home that is not disabled
    pub fn active_home(&self) -> Option<&DashboardHome> {
        self.rewind_entries()
    }
}

impl Sortable for Dashboard {
    type Entry = DashboardHome;

    fn kind(&self) -> ContainerKind {
        ContainerKind::Dashboard
    }

    fn entries(&self) -> &DashboardEntries<DashboardHome> {
        &self.homes
    }

    fn entries_mut(&mut self) -> &mut DashboardEntries<DashboardHome> {
        &mut self.homes
    }

    fn manage_entry(&mut self, entry: DashboardHome, _origin: Option<&Origin>) -> Result<()> {
        if !entry.panes.has_entries() && self.homes.has_entry(&entry.name) {
            self.homes.get_entry_mut(&entry.name)?.merge_from(&entry);
        } else {
            self.homes.put_entry(entry);
        }
        Ok(())
    }
}
