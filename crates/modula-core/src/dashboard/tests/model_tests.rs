use serde_json::json;

use crate::dashboard::model::{Model, RelationKind, SystemDashlet};

#[test]
fn test_system_dashlet_model_metadata() {
    assert_eq!(SystemDashlet::table_name(), "system_dashlet");
    assert_eq!(SystemDashlet::key_name(), "id");
    assert_eq!(SystemDashlet::columns(), &["dashlet_id", "module_dashlet_id", "username"]);

    let relations = SystemDashlet::relations();
    assert_eq!(relations.len(), 2);
    assert!(relations.iter().all(|r| r.kind == RelationKind::BelongsTo));
    assert_eq!(relations[0].target_table, "dashlet");
    assert_eq!(relations[0].foreign_key(), "dashlet_id");
    assert_eq!(relations[1].target_table, "module_dashlet");
    assert_eq!(relations[1].foreign_key(), "module_dashlet_id");
}

#[test]
fn test_system_dashlet_serialization() {
    let record = SystemDashlet::new("3f2a", "monitoring-overview", "icingaadmin");
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(
        value,
        json!({
            "dashlet_id": "3f2a",
            "module_dashlet_id": "monitoring-overview",
            "username": "icingaadmin"
        })
    );

    let stored: SystemDashlet = serde_json::from_value(json!({
        "id": 7,
        "dashlet_id": "3f2a",
        "module_dashlet_id": "monitoring-overview",
        "username": "icingaadmin"
    }))
    .unwrap();
    assert_eq!(stored.id, Some(7));
    assert_eq!(stored.username, "icingaadmin");
}
