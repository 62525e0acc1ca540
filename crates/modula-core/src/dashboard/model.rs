use serde::{Deserialize, Serialize};

/// How a model refers to a row of another table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    BelongsTo,
}

/// A relation from one model table to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub kind: RelationKind,
    pub target_table: &'static str,
    /// Column of this model holding the target's key, when it differs from `<target>_id`
    pub candidate_key: Option<&'static str>,
}

impl Relation {
    pub const fn belongs_to(target_table: &'static str) -> Self {
        Self { kind: RelationKind::BelongsTo, target_table, candidate_key: None }
    }

    pub const fn with_candidate_key(mut self, column: &'static str) -> Self {
        self.candidate_key = Some(column);
        self
    }

    /// Column of the owning model that references the target
    pub fn foreign_key(&self) -> String {
        match self.candidate_key {
            Some(column) => column.to_string(),
            None => format!("{}_id", self.target_table),
        }
    }
}

/// Static description of a persisted record
pub trait Model {
    fn table_name() -> &'static str;

    fn key_name() -> &'static str;

    /// Columns besides the key
    fn columns() -> &'static [&'static str];

    fn relations() -> Vec<Relation>;
}

/// Links a user's dashlet to the module dashlet it was created from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemDashlet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub dashlet_id: String,
    pub module_dashlet_id: String,
    pub username: String,
}

impl SystemDashlet {
    pub fn new(
        dashlet_id: impl Into<String>,
        module_dashlet_id: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            dashlet_id: dashlet_id.into(),
            module_dashlet_id: module_dashlet_id.into(),
            username: username.into(),
        }
    }
}

impl Model for SystemDashlet {
    fn table_name() -> &'static str {
        "system_dashlet"
    }

    fn key_name() -> &'static str {
        "id"
    }

    fn columns() -> &'static [&'static str] {
        &["dashlet_id", "module_dashlet_id", "username"]
    }

    fn relations() -> Vec<Relation> {
        vec![
            Relation::belongs_to("dashlet"),
            Relation::belongs_to("module_dashlet").with_candidate_key("module_dashlet_id"),
        ]
    }
}
