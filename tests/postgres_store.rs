//! Integration tests for the PostgreSQL store
//!
//! These tests require a running PostgreSQL database. Set TEST_DATABASE_URL
//! to run them; without it they return early.

mod common;

use lifeguard_mav::{
    connect, AttrStore, AttrTypeRegistry, AttrValueOptions, HostDescriptor, MayPostgresExecutor,
    NewAttribute, NewChoice, NewUnit, PgStore, SchemaManager, SqlExecutor, StoreError, ValueType,
    Violation,
};

type Fixture = (PgStore<MayPostgresExecutor>, std::sync::Arc<lifeguard_mav::AttrValueType>);

/// Fresh host table `table` with its attribute table; catalog tables are shared
fn setup(type_name: &str, table: &str) -> Option<Fixture> {
    let url = common::database_url()?;
    let executor = MayPostgresExecutor::new(connect(&url).expect("Failed to connect to database"));

    let mut registry = AttrTypeRegistry::default();
    let ty = registry
        .synthesize(
            &HostDescriptor::new(type_name, table),
            AttrValueOptions::default(),
        )
        .expect("synthesize");

    {
        let manager = SchemaManager::new(&executor);
        manager.drop_attr_value_table(&ty).expect("drop attr table");
        executor
            .execute(&format!("DROP TABLE IF EXISTS {table}"), &[])
            .expect("drop host");
        executor
            .execute(
                &format!("CREATE TABLE {table} (id BIGSERIAL PRIMARY KEY, name TEXT)"),
                &[],
            )
            .expect("create host");
    }

    let store = PgStore::new(executor);
    store.install_core_tables().expect("install core tables");
    store.install(&ty).expect("install attr table");
    Some((store, ty))
}

fn insert_host(store: &PgStore<MayPostgresExecutor>, table: &str) -> i64 {
    store
        .executor()
        .query_one(&format!("INSERT INTO {table} (name) VALUES ('x') RETURNING id"), &[])
        .expect("insert host")
        .get(0)
}

#[test]
fn test_pg_catalog_and_values() {
    let Some((store, ty)) = setup("MavValueHost", "mav_value_host") else { return };

    let unit = store.create_unit(NewUnit::new("kilogram", "kg")).unwrap();
    let slug = common::unique_slug(0);
    let weight = store
        .create_attribute(NewAttribute::new(slug.as_str(), ValueType::Decimal).unit(unit.id))
        .unwrap();
    assert_eq!(store.get_attribute_by_slug(&slug).unwrap(), Some(weight.clone()));

    let object_id = insert_host(&store, "mav_value_host");
    let first = store.set_value(&ty, weight.id, object_id, "1.5").unwrap();
    let second = store.set_value(&ty, weight.id, object_id, "2.5").unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(store.values_for(&ty, object_id).unwrap().len(), 1);

    let existing = store.get_or_create_value(&ty, weight.id, object_id).unwrap();
    assert_eq!(existing.value, "2.5");

    // ON DELETE SET NULL
    store.delete_unit(unit.id).unwrap();
    assert_eq!(store.get_attribute(weight.id).unwrap().unit_id, None);

    // Host deletion cascades to its values
    store
        .executor()
        .execute("DELETE FROM mav_value_host WHERE id = $1", &[&object_id])
        .unwrap();
    assert!(store.values_for(&ty, object_id).unwrap().is_empty());
}

#[test]
fn test_pg_attribute_delete_cascades() {
    let Some((store, ty)) = setup("MavCascadeHost", "mav_cascade_host") else { return };

    let attributes = common::one_of_each(&store);
    let size = &attributes[0];
    store.create_choice(NewChoice::new(size.id, "L").sort_order(2)).unwrap();
    store.create_choice(NewChoice::new(size.id, "S").sort_order(1)).unwrap();
    let values: Vec<String> = store
        .choices_for(size.id)
        .unwrap()
        .into_iter()
        .map(|c| c.value)
        .collect();
    assert_eq!(values, vec!["S", "L"]);

    let object_id = insert_host(&store, "mav_cascade_host");
    store.set_value(&ty, size.id, object_id, "S").unwrap();
    store.delete_attribute(size.id).unwrap();
    assert!(store.choices_for(size.id).unwrap().is_empty());
    assert!(store.get_value(&ty, size.id, object_id).unwrap().is_none());
}

#[test]
fn test_pg_stale_references_are_not_found() {
    let Some((store, ty)) = setup("MavStaleHost", "mav_stale_host") else { return };

    let object_id = insert_host(&store, "mav_stale_host");
    let gone = store
        .create_attribute(NewAttribute::new(common::unique_slug(0), ValueType::Text))
        .unwrap();
    store.delete_attribute(gone.id).unwrap();

    assert!(matches!(
        store.set_value(&ty, gone.id, object_id, "x"),
        Err(StoreError::NotFound { entity: "attribute", id }) if id == gone.id
    ));
    assert!(matches!(
        store.get_or_create_value(&ty, gone.id, object_id),
        Err(StoreError::NotFound { entity: "attribute", .. })
    ));

    let live = store
        .create_attribute(NewAttribute::new(common::unique_slug(1), ValueType::Text))
        .unwrap();
    let missing_object = object_id + 1000;
    assert!(matches!(
        store.set_value(&ty, live.id, missing_object, "x"),
        Err(StoreError::NotFound { entity: "object", id }) if id == missing_object
    ));
    assert!(store.values_for(&ty, object_id).unwrap().is_empty());
}

#[test]
fn test_pg_duplicate_slug_from_concurrent_writer() {
    let Some((store, _ty)) = setup("MavSlugHost", "mav_slug_host") else { return };

    // A second writer inserting between the slug lookup and our insert
    let slug = common::unique_slug(0);
    store
        .executor()
        .execute("INSERT INTO attribute (slug, type) VALUES ($1, 1)", &[&slug])
        .expect("first insert");
    let err = store
        .executor()
        .execute("INSERT INTO attribute (slug, type) VALUES ($1, 1)", &[&slug])
        .unwrap_err();
    assert_eq!(err.violation(), Some((Violation::Unique, "attribute_slug_key")));

    assert!(matches!(
        store.create_attribute(NewAttribute::new(slug.as_str(), ValueType::Text)),
        Err(StoreError::DuplicateSlug(s)) if s == slug
    ));
}
