use std::io::{self, BufRead, Write};

use crate::{
    database::{database::Database, model::Visibility},
    model::{fields::PersonField, person::Person},
    parser::parser::parse_command,
};

const PROMPT: &str = "> ";

/// Reads commands line by line until `exit` or end of input.
///
/// Feedback goes to `output`. Commands that change the view are followed by the view itself.
pub fn run(database: &mut Database, input: impl BufRead, output: &mut impl Write) -> io::Result<()> {
    write!(output, "{}", PROMPT)?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;

        if !line.trim().is_empty() && !run_line(database, &line, output)? {
            return Ok(());
        }

        write!(output, "{}", PROMPT)?;
        output.flush()?;
    }

    writeln!(output)
}

/// Runs one line, returns false once the session should stop
pub fn run_line(database: &mut Database, line: &str, output: &mut impl Write) -> io::Result<bool> {
    let command = match parse_command(line) {
        Ok(command) => command,
        Err(e) => {
            writeln!(output, "{}", e)?;
            return Ok(true);
        }
    };

    match database.execute(&command) {
        Ok(result) => {
            writeln!(output, "{}", result.feedback)?;

            if command.changes_view() {
                render_view(database, output)?;
            }

            Ok(!result.exit)
        }
        Err(e) => {
            writeln!(output, "{}", e)?;
            Ok(true)
        }
    }
}

fn render_view(database: &Database, output: &mut impl Write) -> io::Result<()> {
    let model = database.model();

    for (i, person) in model.person_table.filtered_persons().enumerate() {
        writeln!(output, "{}. {}", i + 1, render_person(person, &model.visibility))?;
    }

    Ok(())
}

/// Single line rendering of `person` with hidden fields left out
pub fn render_person(person: &Person, visibility: &Visibility) -> String {
    let mut parts: Vec<String> = vec![];

    if visibility.is_visible(PersonField::Name) {
        parts.push(person.name().to_string());
    }

    if visibility.is_visible(PersonField::Phone) {
        if let Some(phone) = person.phone() {
            parts.push(format!("Phone: {}", phone));
        }
    }

    if visibility.is_visible(PersonField::Email) {
        if let Some(email) = person.email() {
            parts.push(format!("Email: {}", email));
        }
    }

    if visibility.is_visible(PersonField::Address) {
        if let Some(address) = person.address() {
            parts.push(format!("Address: {}", address));
        }
    }

    if visibility.is_visible(PersonField::Tag) && !person.tags().is_empty() {
        parts.push(format!("Tags: {}", person.tags_display()));
    }

    if visibility.is_visible(PersonField::Category) {
        if let Some(category) = person.category() {
            parts.push(format!("Category: {}", category));
        }
    }

    if let Some(remark) = person.remark() {
        parts.push(format!("Remark: {}", remark));
    }

    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::database::options::DatabaseOptions;

    use super::*;

    fn session(input: &str) -> (Database, String) {
        let mut database = Database::open(DatabaseOptions::new_test(), |warning| {
            panic!("unexpected warning: {}", warning)
        });
        let mut output = Vec::new();

        run(&mut database, Cursor::new(input), &mut output).unwrap();

        (database, String::from_utf8(output).unwrap())
    }

    #[test]
    fn stops_at_exit() {
        // Given a session that adds after exiting
        let input = "add n/Alice p/111\nlist\nexit\nadd n/Bob\n";

        // When it runs
        let (database, output) = session(input);

        // Then everything before exit happened, nothing after
        assert!(output.contains("New contact added: Alice; Phone: 111"));
        assert!(output.contains("Listed all persons\n1. Alice; Phone: 111\n"));
        assert!(output.contains("Exiting TrackUp as requested ..."));
        assert_eq!(database.model().person_table.len(), 1);
    }

    #[test]
    fn errors_are_reported_and_the_session_continues() {
        let (database, output) = session("launch\n\nadd p/123\nadd n/Bob\n");

        assert!(output.contains("Unknown command"));
        assert!(output.contains("Invalid command format! \nadd:"));
        assert!(output.contains("New contact added: Bob"));
        assert_eq!(database.model().person_table.len(), 1);
    }

    #[test]
    fn hidden_fields_are_not_rendered() {
        let (_, output) = session("add n/Alice p/111 e/a@bc\ntoggle phone\nlist\n");

        assert!(output.contains("1. Alice; Email: a@bc\n"));
    }

    #[test]
    fn render_with_everything_hidden_but_the_remark() {
        let mut visibility = Visibility::default();
        for field in [
            PersonField::Name,
            PersonField::Phone,
            PersonField::Email,
            PersonField::Address,
            PersonField::Tag,
            PersonField::Category,
        ] {
            visibility.toggle(field);
        }

        let person = Person::new_test().with_remark(Some(crate::model::fields::Remark::new("hi")));

        assert_eq!(render_person(&person, &visibility), "Remark: hi");
    }
}
