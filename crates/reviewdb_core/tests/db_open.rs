use reviewdb_core::{open_db, ReviewStore, SqliteEmployeeRepository};
use std::rc::Rc;

#[test]
fn reviews_survive_reopening_a_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reviews.db");

    {
        let conn = open_db(&path).unwrap();
        let employees = SqliteEmployeeRepository::new(&conn);
        employees.create_table().unwrap();
        employees.create("Lee", "Manager").unwrap();
        let mut store = ReviewStore::new(&conn, employees);
        store.create_table().unwrap();
        store.create(2023, "Great work", 1).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let mut store = ReviewStore::new(&conn, SqliteEmployeeRepository::new(&conn));
    assert_eq!(store.cache_len(), 0);

    let review = store.find_by_id(1).unwrap().unwrap();
    assert_eq!(review.borrow().summary(), "Great work");
    assert!(Rc::ptr_eq(&store.get_all().unwrap()[0], &review));
}

#[test]
fn separate_stores_keep_separate_identity_maps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");
    let conn = open_db(&path).unwrap();
    let employees = SqliteEmployeeRepository::new(&conn);
    employees.create_table().unwrap();
    employees.create("Lee", "Manager").unwrap();

    let mut first = ReviewStore::new(&conn, &employees);
    first.create_table().unwrap();
    let created = first.create(2022, "shared row", 1).unwrap();

    let mut second = ReviewStore::new(&conn, &employees);
    let loaded = second.find_by_id(1).unwrap().unwrap();
    assert!(!Rc::ptr_eq(&created, &loaded));
    assert!(Rc::ptr_eq(&first.find_by_id(1).unwrap().unwrap(), &created));
}

#[test]
fn open_db_fails_for_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("reviews.db");
    assert!(open_db(&path).is_err());
}
