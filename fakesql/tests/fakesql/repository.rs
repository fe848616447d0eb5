use fakesql::{
    Command, Connection, DataReader, Error, Expectation, FieldSelection, Row, Table, Value,
};
use fakesql_core::NaiveDateTime;
use fakesql_derive::Record;

#[derive(Debug, Clone, PartialEq, Record)]
pub struct Person {
    #[record(rename = "Id")]
    pub id: i32,
    #[record(rename = "Name")]
    pub name: String,
    #[record(rename = "DateOfBirth")]
    pub date_of_birth: NaiveDateTime,
}

/// Data access code written against the driver, as an application would.
pub struct PersonRepository {
    connection: Connection,
}

impl PersonRepository {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    pub fn get(&self) -> fakesql::Result<Option<Person>> {
        let command = self.connection.create_command();
        command.set_command_text("SELECT TOP 1 * FROM [People]");
        let mut reader = command.execute_reader()?;
        if !reader.read()? {
            return Ok(None);
        }
        Self::parse(&reader).map(Some)
    }

    pub fn get_all(&self) -> fakesql::Result<Vec<Person>> {
        let command = self.connection.create_command();
        command.set_command_text("SELECT * FROM [People]");
        let mut reader = command.execute_reader()?;
        let mut people = vec![];
        while reader.read()? {
            people.push(Self::parse(&reader)?);
        }
        Ok(people)
    }

    pub fn rename(&self, id: i32, name: &str) -> fakesql::Result<bool> {
        let command = self.connection.create_command();
        command.set_command_text("UPDATE [People] SET Name = @name WHERE Id = @id");
        command.add_parameter_value("name", name);
        command.add_parameter_value("id", id);
        Ok(command.execute_non_query()? == 1)
    }

    fn parse(reader: &DataReader) -> fakesql::Result<Person> {
        Ok(Person {
            id: reader.get_i32(reader.get_ordinal("Id")?)?,
            name: reader.get_string(reader.get_ordinal("Name")?)?,
            date_of_birth: reader.get_datetime(reader.get_ordinal("DateOfBirth")?)?,
        })
    }
}

fn date(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn bob() -> Person {
    Person { id: 1, name: "Bob Robertson".into(), date_of_birth: date("1950-07-26 00:00:00") }
}

#[test]
fn test_get_returns_none_without_rows() -> fakesql::Result<()> {
    let connection = Connection::new();
    let table = Table::with_column_names(["Id", "Name", "DateOfBirth"], Vec::<Row>::new())?;
    connection.setup(Command::from_table(table));

    let repository = PersonRepository::new(connection);
    assert_eq!(repository.get()?, None);
    Ok(())
}

#[test]
fn test_get_returns_the_first_row() -> fakesql::Result<()> {
    let connection = Connection::new();
    let table = Table::with_column_names(
        ["Id", "Name", "DateOfBirth"],
        [fakesql::row![1, "Bob Robertson", date("1950-07-26 00:00:00")]],
    )?;
    connection.setup(Command::from_table(table));

    let repository = PersonRepository::new(connection);
    assert_eq!(repository.get()?, Some(bob()));
    Ok(())
}

#[test]
fn test_get_all_over_records() -> fakesql::Result<()> {
    let people = vec![
        bob(),
        Person { id: 2, name: "Alice".into(), date_of_birth: date("1984-01-02 03:04:05") },
    ];

    let connection = Connection::new();
    let command = Command::new();
    command.setup(
        Expectation::reader(Table::from_records_with(&people, &FieldSelection::public()))
            .with_command_text("SELECT * FROM [People]"),
    );
    connection.setup(command.clone());

    let repository = PersonRepository::new(connection.clone());
    assert_eq!(repository.get_all()?, people);
    assert_eq!(command.executed_commands()[0].command_text(), "SELECT * FROM [People]");
    assert_eq!(connection.commands().len(), 1);
    Ok(())
}

#[test]
fn test_wrong_query_fails_the_repository_call() {
    let connection = Connection::new();
    connection.setup(Command::with_expectations([Expectation::reader(Table::from_records(&[
        bob(),
    ]))
    .with_command_text("SELECT * FROM [People]")]));

    let repository = PersonRepository::new(connection);
    assert!(matches!(repository.get(), Err(Error::Validation(_))));
}

#[test]
fn test_missing_setup_is_a_configuration_error() {
    let repository = PersonRepository::new(Connection::new());
    assert!(matches!(repository.get(), Err(Error::MissingResult { .. })));
}

#[test]
fn test_rename() -> fakesql::Result<()> {
    let connection = Connection::new();
    let command = Command::with_expectations([Expectation::non_query(1)
        .with_command_text("UPDATE [People] SET Name = @name WHERE Id = @id")
        .with_parameter("name", "Robert")
        .with_parameter("id", 1)]);
    connection.setup(command.clone());

    let repository = PersonRepository::new(connection);
    assert!(repository.rename(1, "Robert")?);
    // without a prepared command the factory reports one affected row
    assert!(repository.rename(2, "Alice")?);

    let executed = command.executed_commands();
    assert_eq!(executed.len(), 1);
    assert_eq!(executed[0].parameters()[0].value(), &Value::from("Robert"));
    Ok(())
}
