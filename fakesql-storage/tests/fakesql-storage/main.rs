use fakesql_core::{FieldSelection, LogicalType, Record, Value, Visibility};
use fakesql_derive::Record;
use fakesql_storage::{row, DataReader, DataRecord, Error, Result, Table};

#[derive(Debug, Clone, Record)]
struct User {
    pub id: i32,
    #[record(rename = "UserName")]
    pub user_name: String,
    pub email: Option<String>,
    password_hash: String,
    #[record(skip)]
    #[allow(dead_code)]
    pub tags: Vec<String>,
}

fn user(id: i32, name: &str) -> User {
    User {
        id,
        user_name: name.to_owned(),
        email: None,
        password_hash: format!("hash-{id}"),
        tags: vec![],
    }
}

fn column_names(table: &Table) -> Vec<&str> {
    table.columns().iter().map(|column| column.name()).collect()
}

#[test]
fn test_describe_fields() {
    let fields = User::describe_fields();
    let names = fields.iter().map(|field| field.name()).collect::<Vec<_>>();
    assert_eq!(names, ["id", "UserName", "email", "password_hash"]);
    assert_eq!(fields[2].logical_type(), LogicalType::Text);
    assert_eq!(fields[3].visibility(), Visibility::NonPublic);
    assert_eq!(fields[1].get(&user(1, "jonas")), Value::from("jonas"));
}

#[test]
fn test_table_from_records() {
    let table = Table::from_records(&[user(1, "jonas"), user(2, "arne")]);
    assert_eq!(column_names(&table), ["id", "UserName", "email"]);
    assert_eq!(table.columns()[0].logical_type(), LogicalType::Int32);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows()[1], row![2, "arne", Value::Null]);
}

#[test]
fn test_table_from_records_with_non_public_fields() {
    let users = vec![user(1, "jonas")];
    let table = Table::from_records_with(&users, &FieldSelection::all());
    assert_eq!(column_names(&table), ["id", "UserName", "email", "password_hash"]);
    assert_eq!(table[(0, 3)], Value::from("hash-1"));
}

#[test]
fn test_include_list_keeps_declaration_order() {
    let selection = FieldSelection::all().include(["password_hash", "id"]);
    let table = Table::from_records_with(&[user(7, "ola")], &selection);
    assert_eq!(column_names(&table), ["id", "password_hash"]);
    assert_eq!(table.rows()[0], row![7, "hash-7"]);

    let public_only = FieldSelection::public().include(["password_hash", "id"]);
    let table = Table::from_records_with(&[user(7, "ola")], &public_only);
    assert_eq!(column_names(&table), ["id"]);
}

#[test]
fn test_add_record() {
    let mut table = Table::for_record::<User>();
    assert_eq!(table.row_count(), 0);
    assert_eq!(table.column_count(), 3);

    table.add_record(&user(1, "jonas"));
    assert_eq!(table.rows()[0], row![1, "jonas", Value::Null]);
}

#[derive(Record)]
struct Account {
    pub id: i32,
}

#[test]
fn test_add_record_fills_unknown_columns_with_null() {
    let mut table = Table::for_record::<User>();
    table.add_record(&Account { id: 5 });
    assert_eq!(table.rows()[0], row![5, Value::Null, Value::Null]);
}

#[test]
fn test_reader_over_records() -> Result<()> {
    let mut reader = DataReader::new(Table::from_records(&[user(1, "jonas")]));
    assert!(reader.read()?);
    assert_eq!(reader.get_string(reader.get_ordinal("UserName")?)?, "jonas");
    assert!(reader.is_null(2)?);
    assert_eq!(reader.get_data_type_name(2)?, "text");
    assert!(!reader.read()?);
    Ok(())
}

#[test]
fn test_data_record() -> Result<()> {
    let mut record = DataRecord::new();
    record.push("Id", 1);
    record.push_typed("Name", Value::Null, LogicalType::Text);
    record.push("Missing", Value::Null);

    assert_eq!(record.field_count(), 3);
    assert_eq!(record.get_ordinal("Name"), Some(1));
    assert_eq!(record.get_ordinal("name"), None);
    assert_eq!(record.get_name(0)?, "Id");
    assert_eq!(record.get::<i64>(0)?, 1);
    assert_eq!(record.get_field_type(0)?, LogicalType::Int32);
    assert_eq!(record.get_field_type(1)?, LogicalType::Text);
    assert_eq!(record.get_field_type(2)?, LogicalType::Null);
    assert!(record.is_null(1)?);
    assert!(matches!(record.get_value(3), Err(Error::OrdinalOutOfRange { ordinal: 3, .. })));
    Ok(())
}
