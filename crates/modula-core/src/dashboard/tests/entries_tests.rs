use crate::dashboard::entries::{ContainerKind, DashboardEntries, DashboardEntry, Origin, Sortable};
use crate::dashboard::error::DashboardError;
use crate::kernel::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
struct Item {
    name: String,
    title: String,
    priority: i64,
    disabled: bool,
}

fn item(name: &str, priority: i64) -> Item {
    Item { name: name.to_string(), title: name.to_uppercase(), priority, disabled: false }
}

impl DashboardEntry for Item {
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

/// Records every managed entry together with the origin it was handed
struct Recorder {
    kind: ContainerKind,
    items: DashboardEntries<Item>,
    managed: Vec<(String, i64, Option<Origin>)>,
}

impl Recorder {
    fn new(kind: ContainerKind, items: Vec<Item>) -> Self {
        let mut entries = DashboardEntries::new();
        entries.set_entries(items);
        Self { kind, items: entries, managed: Vec::new() }
    }
}

impl Sortable for Recorder {
    type Entry = Item;

    fn kind(&self) -> ContainerKind {
        self.kind
    }

    fn entries(&self) -> &DashboardEntries<Item> {
        &self.items
    }

    fn entries_mut(&mut self) -> &mut DashboardEntries<Item> {
        &mut self.items
    }

    fn manage_entry(&mut self, entry: Item, origin: Option<&Origin>) -> Result<()> {
        self.managed.push((entry.name.clone(), entry.priority, origin.cloned()));
        Ok(())
    }
}

fn names(entries: &[Item]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn test_entries_sorted_by_priority() {
    let mut entries = DashboardEntries::new();
    entries.add_entry(item("c", 3)).add_entry(item("a", 1)).add_entry(item("b", 2));

    assert_eq!(names(entries.entries()), vec!["a", "b", "c"]);

    entries.add_entry(item("first", 0));
    assert_eq!(names(entries.entries()), vec!["first", "a", "b", "c"]);
}

#[test]
fn test_equal_priorities_keep_insertion_order() {
    let mut entries = DashboardEntries::new();
    entries.add_entry(item("x", 1)).add_entry(item("y", 1)).add_entry(item("z", 0));
    assert_eq!(names(entries.entries()), vec!["z", "x", "y"]);
}

#[test]
fn test_add_existing_entry_merges() {
    let mut entries = DashboardEntries::new();
    entries.add_entry(item("a", 5));

    let mut update = item("a", 1);
    update.title = "Renamed".to_string();
    entries.add_entry(update);

    assert_eq!(entries.len(), 1);
    let stored = entries.get_entry("a").unwrap();
    assert_eq!(stored.title, "Renamed");
    assert_eq!(stored.priority, 1);
}

#[test]
fn test_set_entries_keeps_last_of_duplicates() {
    let mut entries = DashboardEntries::new();
    entries.set_entries(vec![item("a", 2), item("b", 1), item("a", 0)]);
    assert_eq!(entries.len(), 2);
    assert_eq!(names(entries.entries()), vec!["a", "b"]);
}

#[test]
fn test_get_unknown_entry_fails() {
    let entries: DashboardEntries<Item> = DashboardEntries::new();
    assert!(!entries.has_entries());
    match entries.get_entry("missing") {
        Err(Error::Dashboard(DashboardError::UnknownEntry(name))) => assert_eq!(name, "missing"),
        other => panic!("Expected UnknownEntry, got {:?}", other),
    }
}

#[test]
fn test_entry_key_title_map_follows_priority() {
    let mut entries = DashboardEntries::new();
    entries.add_entry(item("b", 2)).add_entry(item("a", 1));
    assert_eq!(
        entries.entry_key_title_map(),
        vec![("a".to_string(), "A".to_string()), ("b".to_string(), "B".to_string())]
    );
}

#[test]
fn test_remove_entries() {
    let mut entries = DashboardEntries::new();
    entries.set_entries(vec![item("a", 0), item("b", 1), item("c", 2)]);

    assert_eq!(entries.remove_entry("b").map(|e| e.name), Some("b".to_string()));
    assert!(entries.remove_entry("b").is_none());

    entries.remove_entries(&["a"]);
    assert_eq!(names(entries.entries()), vec!["c"]);

    entries.remove_entries(&[]);
    assert!(!entries.has_entries());
}

#[test]
fn test_rewind_skips_disabled_only_for_dashboards() {
    let mut disabled = item("a", 0);
    disabled.disabled = true;
    let items = vec![disabled, item("b", 1)];

    let dashboard = Recorder::new(ContainerKind::Dashboard, items.clone());
    assert_eq!(dashboard.rewind_entries().map(|e| e.name.as_str()), Some("b"));

    let home = Recorder::new(ContainerKind::Home, items);
    assert_eq!(home.rewind_entries().map(|e| e.name.as_str()), Some("a"));

    let empty = Recorder::new(ContainerKind::Pane, Vec::new());
    assert!(empty.rewind_entries().is_none());
}

#[test]
fn test_reorder_moves_last_entry_to_front() -> Result<()> {
    let mut pane = Recorder::new(ContainerKind::Pane, vec![item("a", 0), item("b", 1), item("c", 2)]);

    pane.reorder_widget(item("c", 2), 0, None)?;

    let managed: Vec<(&str, i64)> = pane.managed.iter().map(|(n, p, _)| (n.as_str(), *p)).collect();
    assert_eq!(managed, vec![("c", 0), ("a", 1), ("b", 2)]);
    assert_eq!(names(pane.items.entries()), vec!["c", "a", "b"]);
    Ok(())
}

#[test]
fn test_reorder_clamps_position() -> Result<()> {
    let mut pane = Recorder::new(ContainerKind::Pane, vec![item("a", 0), item("b", 1), item("c", 2)]);

    pane.reorder_widget(item("a", 0), 10, None)?;

    assert_eq!(names(pane.items.entries()), vec!["b", "c", "a"]);
    assert_eq!(pane.items.get_entry("a")?.priority, 2);
    Ok(())
}

#[test]
fn test_reorder_new_entry_only_manages_it() -> Result<()> {
    let mut pane = Recorder::new(ContainerKind::Pane, vec![item("a", 0), item("b", 1)]);
    let origin = Origin::new(ContainerKind::Pane, "other");

    pane.reorder_widget(item("new", 9), 1, Some(&origin))?;

    assert_eq!(pane.managed, vec![("new".to_string(), 1, Some(origin))]);
    // Stored entries are untouched
    assert_eq!(pane.items.get_entry("b")?.priority, 1);
    Ok(())
}

#[test]
fn test_reorder_single_entry_keeps_priority() -> Result<()> {
    let mut pane = Recorder::new(ContainerKind::Pane, vec![item("only", 7)]);

    pane.reorder_widget(item("only", 7), 0, None)?;

    assert_eq!(pane.managed, vec![("only".to_string(), 7, None)]);
    Ok(())
}

#[test]
fn test_reorder_passes_origin_to_moved_entry_only() -> Result<()> {
    let mut home = Recorder::new(ContainerKind::Home, vec![item("a", 0), item("b", 1)]);
    let origin = Origin::new(ContainerKind::Home, "elsewhere");

    home.reorder_widget(item("b", 1), 0, Some(&origin))?;

    assert_eq!(
        home.managed,
        vec![("b".to_string(), 0, Some(origin)), ("a".to_string(), 1, None)]
    );
    Ok(())
}

#[test]
fn test_reorder_rejects_foreign_origin() {
    let mut pane = Recorder::new(ContainerKind::Pane, vec![item("a", 0)]);
    let origin = Origin::new(ContainerKind::Home, "home");

    let err = pane.reorder_widget(item("a", 0), 0, Some(&origin)).unwrap_err();
    match err {
        Error::Dashboard(DashboardError::InvalidOrigin { expected, actual }) => {
            assert_eq!(expected, ContainerKind::Pane);
            assert_eq!(actual, ContainerKind::Home);
        }
        other => panic!("Expected InvalidOrigin, got {:?}", other),
    }
    assert!(pane.managed.is_empty());
}

#[test]
fn test_invalid_origin_message() {
    let err = DashboardError::InvalidOrigin { expected: ContainerKind::Pane, actual: ContainerKind::Home };
    assert_eq!(err.to_string(), "Reordering expects an origin of kind 'pane'. Got 'home' instead");
}
