use reviewdb_core::{
    open_db_in_memory, EmployeeLookup, RepoError, SqliteEmployeeRepository, ValidationError,
};

#[test]
fn create_and_find_employee() {
    let conn = open_db_in_memory().unwrap();
    let employees = SqliteEmployeeRepository::new(&conn);
    employees.create_table().unwrap();

    let lee = employees.create("Lee", "Manager").unwrap();
    let found = employees.find_by_id(lee.id).unwrap().unwrap();
    assert_eq!(found, lee);

    let via_port = (&employees).find_employee(lee.id).unwrap();
    assert_eq!(via_port, Some(lee));
    assert!(employees.find_employee(999).unwrap().is_none());
}

#[test]
fn get_all_lists_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let employees = SqliteEmployeeRepository::new(&conn);
    employees.create_table().unwrap();
    employees.create("Lee", "Manager").unwrap();
    employees.create("Sasha", "Engineer").unwrap();

    let names = employees
        .get_all()
        .unwrap()
        .into_iter()
        .map(|employee| employee.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Lee", "Sasha"]);
}

#[test]
fn blank_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let employees = SqliteEmployeeRepository::new(&conn);
    employees.create_table().unwrap();

    let err = employees.create(" ", "Manager").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyEmployeeName)
    ));
    assert!(employees.get_all().unwrap().is_empty());
}

#[test]
fn table_lifecycle_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let employees = SqliteEmployeeRepository::new(&conn);
    employees.create_table().unwrap();
    employees.create_table().unwrap();
    employees.drop_table().unwrap();
    employees.drop_table().unwrap();

    assert!(matches!(employees.find_by_id(1), Err(RepoError::Db(_))));
}

#[test]
fn null_or_blank_name_rows_are_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let employees = SqliteEmployeeRepository::new(&conn);
    employees.create_table().unwrap();
    conn.execute(
        "INSERT INTO employee (id, name, job_title) VALUES (1, NULL, 'Manager'), (2, '  ', NULL);",
        [],
    )
    .unwrap();

    for id in [1, 2] {
        let err = employees.find_by_id(id).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("name")));
    }
    assert!(matches!(employees.get_all(), Err(RepoError::InvalidData(_))));
}
