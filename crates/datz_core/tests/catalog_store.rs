use datz_core::db::{open_db, open_db_in_memory};
use datz_core::{
    gen_key, CatalogError, CatalogStore, CombiMeta, KeyValueRepository, LaunchState,
    SqliteKeyValueRepository, SubjectMeta, Year,
};
use rusqlite::Connection;

fn store(conn: &Connection) -> CatalogStore<SqliteKeyValueRepository<'_>> {
    CatalogStore::new(SqliteKeyValueRepository::try_new(conn).unwrap())
}

fn raw(conn: &Connection, key: &str) -> Option<String> {
    SqliteKeyValueRepository::try_new(conn)
        .unwrap()
        .get(key)
        .unwrap()
}

fn persisted_names(conn: &Connection) -> Vec<String> {
    serde_json::from_str(&raw(conn, "allNames").unwrap()).unwrap()
}

fn custom_year(name: &str) -> Year {
    Year::new(
        name,
        vec![
            SubjectMeta::new("Mathématiques", 4.0),
            SubjectMeta::composite(
                "Artistique",
                2.0,
                CombiMeta::new(vec![
                    SubjectMeta::new("Dessin", 1.0),
                    SubjectMeta::new("HistoArt", 2.0),
                ]),
            ),
        ],
    )
}

#[test]
fn bootstrap_on_first_launch_seeds_defaults_and_presets() {
    let conn = open_db_in_memory().unwrap();
    let mut catalog = store(&conn);

    assert!(catalog.is_first_launch().unwrap());
    assert_eq!(catalog.bootstrap().unwrap(), LaunchState::FirstLaunch);

    assert!(catalog.all_names().is_empty());
    assert!(catalog.active_year().is_none());
    assert_eq!(catalog.preset_years().len(), 21);
    assert_eq!(raw(&conn, "allNames").as_deref(), Some("[]"));
    assert_eq!(raw(&conn, "activeIndex").as_deref(), Some("0"));
}

#[test]
fn first_launch_flag_flips_on_save_and_back_on_reset() {
    let conn = open_db_in_memory().unwrap();
    let mut catalog = store(&conn);
    catalog.bootstrap().unwrap();
    catalog.add_year(custom_year("2024")).unwrap();
    catalog.select_year("2024").unwrap();

    assert!(catalog.is_first_launch().unwrap());
    catalog.save().unwrap();
    assert!(!catalog.is_first_launch().unwrap());
    assert_eq!(raw(&conn, "firstLaunch").as_deref(), Some("not first launch"));

    let mut reopened = store(&conn);
    assert_eq!(reopened.bootstrap().unwrap(), LaunchState::Restored);
    assert!(!reopened.is_first_launch().unwrap());

    reopened.reset().unwrap();
    assert!(reopened.is_first_launch().unwrap());
    assert_eq!(persisted_names(&conn), vec!["2024".to_string()]);
}

#[test]
fn save_then_load_restores_active_year_at_active_index() {
    let conn = open_db_in_memory().unwrap();
    {
        let mut catalog = store(&conn);
        catalog.bootstrap().unwrap();
        catalog.add_preset(0, None).unwrap();
        catalog.add_preset(7, None).unwrap();
        catalog.add_year(custom_year("mine")).unwrap();
        catalog.select_year("3MA").unwrap();
        catalog.active_year_mut().unwrap().subjects[0].coef = 5.0;
        catalog.save().unwrap();
        assert_eq!(catalog.active_index(), Some(1));
    }

    assert_eq!(raw(&conn, "activeIndex").as_deref(), Some("1"));

    let mut catalog = store(&conn);
    catalog.load().unwrap();
    let active = catalog.active_year().unwrap();
    let index = catalog.active_index().unwrap();
    assert_eq!(active.name, catalog.all_names()[index]);
    assert_eq!(active.name, "3MA");
    assert_eq!(active.subjects[0].coef, 5.0);
    assert_eq!(
        catalog.all_names(),
        ["7e".to_string(), "3MA".to_string(), "mine".to_string()]
    );
}

#[test]
fn name_list_mutations_are_written_through() {
    let conn = open_db_in_memory().unwrap();
    let mut catalog = store(&conn);
    catalog.load_default_values().unwrap();
    catalog.load_preset_years();

    catalog.add_year(custom_year("a")).unwrap();
    assert_eq!(persisted_names(&conn), catalog.all_names());

    catalog.add_preset(3, Some("b")).unwrap();
    assert_eq!(persisted_names(&conn), catalog.all_names());

    catalog.delete("a").unwrap();
    assert_eq!(persisted_names(&conn), catalog.all_names());
    assert_eq!(catalog.all_names(), ["b".to_string()]);
    catalog.verify_consistency().unwrap();
}

#[test]
fn load_writes_the_name_list_back_once() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueRepository::try_new(&conn).unwrap();
    kv.set("allNames", "[ \"x\" ]").unwrap();
    kv.set("activeIndex", "0").unwrap();
    kv.set(&gen_key("x"), &serde_json::to_string(&custom_year("x")).unwrap())
        .unwrap();

    let mut catalog = store(&conn);
    catalog.load().unwrap();

    assert_eq!(raw(&conn, "allNames").as_deref(), Some("[\"x\"]"));
}

#[test]
fn delete_clears_record_and_rejects_unknown_names() {
    let conn = open_db_in_memory().unwrap();
    let mut catalog = store(&conn);
    catalog.bootstrap().unwrap();
    catalog.add_preset(1, None).unwrap();
    assert!(raw(&conn, &gen_key("6C")).is_some());

    catalog.delete("6C").unwrap();
    assert!(!catalog.all_names().contains(&"6C".to_string()));
    assert_eq!(raw(&conn, &gen_key("6C")), None);

    let err = catalog.delete("6C").unwrap_err();
    assert!(matches!(err, CatalogError::YearNotFound(name) if name == "6C"));
}

#[test]
fn deleting_active_year_requires_new_selection_before_save() {
    let conn = open_db_in_memory().unwrap();
    let mut catalog = store(&conn);
    catalog.bootstrap().unwrap();
    catalog.add_preset(0, None).unwrap();
    catalog.add_preset(2, None).unwrap();
    catalog.select_year("7e").unwrap();

    catalog.delete("7e").unwrap();
    assert!(catalog.active_year().is_none());
    assert!(matches!(catalog.save(), Err(CatalogError::NoActiveYear)));

    catalog.select_year("6M").unwrap();
    catalog.save().unwrap();
    assert_eq!(raw(&conn, "activeIndex").as_deref(), Some("0"));
}

#[test]
fn duplicate_year_names_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let mut catalog = store(&conn);
    catalog.bootstrap().unwrap();

    catalog.add_preset(19, None).unwrap();
    let err = catalog.add_preset(20, None).unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateYearName(name) if name == "3MG"));

    catalog.add_preset(20, Some("3MG latin")).unwrap();
    assert_eq!(
        catalog.all_names(),
        ["3MG".to_string(), "3MG latin".to_string()]
    );
    assert_eq!(persisted_names(&conn), catalog.all_names());
}

#[test]
fn add_preset_rejects_out_of_range_index() {
    let conn = open_db_in_memory().unwrap();
    let mut catalog = store(&conn);
    catalog.bootstrap().unwrap();

    let err = catalog.add_preset(21, None).unwrap_err();
    assert!(matches!(err, CatalogError::PresetNotFound(21)));
    assert!(catalog.all_names().is_empty());
}

#[test]
fn invalid_years_never_reach_the_store() {
    let conn = open_db_in_memory().unwrap();
    let mut catalog = store(&conn);
    catalog.bootstrap().unwrap();

    let err = catalog
        .add_year(Year::new("bad", vec![SubjectMeta::new("Latin", -2.0)]))
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
    assert_eq!(raw(&conn, &gen_key("bad")), None);
    assert!(catalog.all_names().is_empty());
}

#[test]
fn load_reports_corrupt_state_for_missing_names() {
    let conn = open_db_in_memory().unwrap();
    let mut catalog = store(&conn);

    let err = catalog.load().unwrap_err();
    assert!(err.is_corrupt_state(), "unexpected error: {err}");
}

#[test]
fn load_reports_corrupt_state_for_bad_values() {
    let cases: &[(&str, &str, &str)] = &[
        ("[\"x\"]", "not-a-number", "activeIndex"),
        ("[\"x\"]", "3", "activeIndex"),
        ("{\"x\": 1}", "0", "allNames"),
        ("[\"x\", \"x\"]", "0", "allNames"),
    ];

    for (names, index, broken_key) in cases {
        let conn = open_db_in_memory().unwrap();
        let kv = SqliteKeyValueRepository::try_new(&conn).unwrap();
        kv.set("allNames", names).unwrap();
        kv.set("activeIndex", index).unwrap();
        kv.set(&gen_key("x"), &serde_json::to_string(&custom_year("x")).unwrap())
            .unwrap();

        let err = store(&conn).load().unwrap_err();
        match err {
            CatalogError::CorruptCatalogState { key, .. } => assert_eq!(key, *broken_key),
            other => panic!("unexpected error for {names}/{index}: {other}"),
        }
    }
}

#[test]
fn load_reports_corrupt_state_for_missing_or_malformed_record() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueRepository::try_new(&conn).unwrap();
    kv.set("allNames", "[\"x\"]").unwrap();
    kv.set("activeIndex", "0").unwrap();

    let err = store(&conn).load().unwrap_err();
    assert!(matches!(
        err,
        CatalogError::CorruptCatalogState { ref key, .. } if key == "KEY_x"
    ));

    kv.set(&gen_key("x"), "{\"name\": \"x\", \"subjects\": 7}")
        .unwrap();
    let err = store(&conn).load().unwrap_err();
    assert!(err.is_corrupt_state());
    assert!(err.to_string().contains("malformed year record"));

    kv.set(&gen_key("x"), &serde_json::to_string(&custom_year("y")).unwrap())
        .unwrap();
    let err = store(&conn).load().unwrap_err();
    assert!(err.to_string().contains("does not match its key"));
}

#[test]
fn load_year_distinguishes_absent_from_corrupt() {
    let conn = open_db_in_memory().unwrap();
    let catalog = store(&conn);

    assert!(matches!(
        catalog.load_year("nope"),
        Err(CatalogError::YearNotFound(name)) if name == "nope"
    ));

    catalog.repo().set(&gen_key("junk"), "not json").unwrap();
    assert!(catalog.load_year("junk").unwrap_err().is_corrupt_state());
    assert!(catalog
        .load_year_by_key("allNames")
        .unwrap_err()
        .is_corrupt_state());
}

#[test]
fn records_written_with_legacy_field_layout_still_load() {
    let conn = open_db_in_memory().unwrap();
    let catalog = store(&conn);
    let legacy = r#"{
        "name": "3CE",
        "subjects": [
            {
                "name": "Artistique",
                "coef": 4,
                "combiMeta": {
                    "subjects": [
                        {"name": "Dessin", "coef": 1},
                        {"name": "Graphisme", "coef": 1},
                        {"name": "HistoArt", "coef": 1}
                    ]
                }
            },
            {"name": "Latin", "coef": 3, "combiMeta": null}
        ]
    }"#;
    catalog.repo().set("KEY_3CE", legacy).unwrap();

    let year = catalog.load_year("3CE").unwrap();
    assert_eq!(year.subjects.len(), 2);
    let combi = year.subjects[0].combi_meta.as_ref().unwrap();
    assert_eq!(combi.subjects[2].name, "HistoArt");
    assert!(year.subjects[1].combi_meta.is_none());
}

#[test]
fn rename_active_year_moves_record_and_slot() {
    let conn = open_db_in_memory().unwrap();
    let mut catalog = store(&conn);
    catalog.bootstrap().unwrap();
    catalog.add_preset(0, None).unwrap();
    catalog.add_preset(1, None).unwrap();
    catalog.select_year("6C").unwrap();

    catalog.rename_active_year("6C 2025").unwrap();
    assert_eq!(
        catalog.all_names(),
        ["7e".to_string(), "6C 2025".to_string()]
    );
    assert_eq!(raw(&conn, &gen_key("6C")), None);
    assert!(raw(&conn, &gen_key("6C 2025")).is_some());
    catalog.verify_consistency().unwrap();

    let err = catalog.rename_active_year("7e").unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateYearName(_)));
}

#[test]
fn reseeding_after_reset_clears_stale_records() {
    let conn = open_db_in_memory().unwrap();
    let mut catalog = store(&conn);
    catalog.bootstrap().unwrap();
    catalog.add_preset(0, None).unwrap();
    catalog.select_year("7e").unwrap();
    catalog.save().unwrap();
    catalog.reset().unwrap();

    let mut reseeded = store(&conn);
    assert_eq!(reseeded.bootstrap().unwrap(), LaunchState::FirstLaunch);
    assert!(reseeded.all_names().is_empty());
    assert_eq!(raw(&conn, &gen_key("7e")), None);
    reseeded.verify_consistency().unwrap();
}

#[test]
fn verify_consistency_flags_orphan_records() {
    let conn = open_db_in_memory().unwrap();
    let mut catalog = store(&conn);
    catalog.bootstrap().unwrap();
    catalog.add_preset(0, None).unwrap();
    catalog
        .repo()
        .set(&gen_key("ghost"), &serde_json::to_string(&custom_year("ghost")).unwrap())
        .unwrap();

    let err = catalog.verify_consistency().unwrap_err();
    assert!(matches!(
        err,
        CatalogError::CorruptCatalogState { ref key, .. } if key == "KEY_ghost"
    ));
}

#[test]
fn file_backed_catalog_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let mut catalog = store(&conn);
        catalog.bootstrap().unwrap();
        catalog.add_preset(15, None).unwrap();
        catalog.select_year("3ME").unwrap();
        catalog.save().unwrap();
    }

    let conn = open_db(&path).unwrap();
    let mut catalog = store(&conn);
    assert_eq!(catalog.bootstrap().unwrap(), LaunchState::Restored);
    let active = catalog.active_year().unwrap();
    assert_eq!(active.name, "3ME");
    assert!(active.subjects[0].is_composite());
    assert_eq!(catalog.preset_years().len(), 21);
}

#[test]
fn load_with_empty_name_list_has_no_active_year() {
    let conn = open_db_in_memory().unwrap();
    let mut catalog = store(&conn);
    catalog.bootstrap().unwrap();
    catalog.add_preset(0, None).unwrap();
    catalog.select_year("7e").unwrap();
    catalog.save().unwrap();
    catalog.delete("7e").unwrap();

    let mut reopened = store(&conn);
    assert_eq!(reopened.bootstrap().unwrap(), LaunchState::Restored);
    assert!(reopened.all_names().is_empty());
    assert!(reopened.active_year().is_none());
}

#[test]
fn failed_reload_keeps_previous_names_and_active_year() {
    let conn = open_db_in_memory().unwrap();
    let mut catalog = store(&conn);
    catalog.bootstrap().unwrap();
    catalog.add_year(custom_year("a")).unwrap();
    catalog.select_year("a").unwrap();
    catalog.save().unwrap();

    catalog.repo().set("allNames", "[\"c\"]").unwrap();
    catalog.repo().set("activeIndex", "3").unwrap();

    let err = catalog.load().unwrap_err();
    assert!(err.is_corrupt_state());
    assert_eq!(catalog.all_names(), ["a".to_string()]);
    assert_eq!(catalog.active_year().map(|year| year.name.as_str()), Some("a"));
    assert_eq!(catalog.active_index(), Some(0));

    catalog.save().unwrap();
    assert_eq!(raw(&conn, "activeIndex").as_deref(), Some("0"));
}

#[test]
fn saved_year_reads_back_equal() {
    let conn = open_db_in_memory().unwrap();
    let mut catalog = store(&conn);
    catalog.bootstrap().unwrap();
    let original = custom_year("2025");

    catalog.add_year(original.clone()).unwrap();
    assert_eq!(catalog.load_year("2025").unwrap(), original);

    catalog.select_year("2025").unwrap();
    catalog.active_year_mut().unwrap().subjects[0].coef = 6.0;
    catalog.save().unwrap();

    let mut expected = original;
    expected.subjects[0].coef = 6.0;
    assert_eq!(catalog.load_year("2025").unwrap(), expected);
}

#[test]
fn added_year_names_are_trimmed() {
    let conn = open_db_in_memory().unwrap();
    let mut catalog = store(&conn);
    catalog.bootstrap().unwrap();

    catalog.add_year(custom_year("  x ")).unwrap();
    assert_eq!(catalog.all_names(), ["x".to_string()]);
    assert!(raw(&conn, &gen_key("x")).is_some());
    assert_eq!(raw(&conn, &gen_key("  x ")), None);

    catalog.select_year("x").unwrap();
    let err = catalog.add_year(custom_year("x ")).unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateYearName(name) if name == "x"));
}
