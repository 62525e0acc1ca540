//! Navigation trees built from module menu sections and dashboard panes.
use serde::Serialize;

use crate::module_system::provides::Properties;

/// An ordered list of navigation items
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Navigation {
    items: Vec<NavigationItem>,
}

/// A single entry of a navigation tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationItem {
    pub name: String,
    pub label: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    /// Properties without a dedicated field
    #[serde(skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
    #[serde(skip_serializing_if = "Navigation::is_empty")]
    pub children: Navigation,
}

impl NavigationItem {
    /// Build an item from raw properties. `label`, `type`, `url` and `priority`
    /// are lifted into their fields; a missing label falls back to the name.
    pub fn from_properties(name: &str, mut properties: Properties, children: Navigation) -> Self {
        let label = match properties.remove("label") {
            Some(serde_json::Value::String(label)) => label,
            Some(other) if !other.is_null() => other.to_string(),
            _ => name.to_string(),
        };
        let item_type = properties
            .remove("type")
            .and_then(|v| v.as_str().map(str::to_string));
        let url = properties
            .remove("url")
            .and_then(|v| v.as_str().map(str::to_string));
        let priority = properties.remove("priority").and_then(|v| v.as_i64());

        Self {
            name: name.to_string(),
            label,
            item_type,
            url,
            priority,
            properties,
            children,
        }
    }

    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item. An item of the same name is replaced in place.
    pub fn add_item(&mut self, item: NavigationItem) -> &mut Self {
        match self.items.iter_mut().find(|i| i.name == item.name) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&NavigationItem> {
        self.items.iter().find(|i| i.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NavigationItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Navigation {
    type Item = &'a NavigationItem;
    type IntoIter = std::slice::Iter<'a, NavigationItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
