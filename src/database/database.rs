use std::time::Instant;

use num_format::{Locale, ToFormattedString};
use thiserror::Error;

use crate::{
    model::command::{Command, CommandResult},
    parser::parser::{parse_command, ParseError},
    persistence::{
        persistence::Persistence,
        snapshot::LoadError,
        storage::{StorageError, StorageResult},
    },
};

use super::{
    commands::CommandError,
    model::{Model, Visibility},
    options::DatabaseOptions,
    table::table::PersonTable,
};

/// Why a line had no (or only partial) effect. The message is shown to the user as is.
#[derive(Error, Debug)]
pub enum TrackUpError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Command(#[from] CommandError),

    /// The command was applied in memory, only persisting it failed
    #[error("Could not save data to file: {0}")]
    Save(#[from] StorageError),
}

/// Recoverable problems found while opening the database
#[derive(Error, Debug)]
pub enum StartupWarning {
    #[error("Storage could not be initialized: {0}")]
    StorageUnavailable(StorageError),

    #[error("Data file could not be loaded, starting with an empty address book: {0}")]
    AddressBookUnreadable(LoadError),

    #[error("Preferences could not be loaded, using defaults: {0}")]
    PreferencesUnreadable(LoadError),
}

pub struct Database {
    model: Model,
    persistence: Persistence,
    database_options: DatabaseOptions,
}

impl Database {
    /// Opens storage and, when restoring, loads the address book and preferences.
    ///
    /// Never fails: unreadable data is reported through `report` and replaced with defaults.
    pub fn open(options: DatabaseOptions, mut report: impl FnMut(StartupWarning)) -> Self {
        log::info!("Data Location: [{}]", options.storage_engine.location());

        let now = Instant::now();

        let mut persistence = Persistence::new(&options.storage_engine);

        if let Err(e) = persistence.init() {
            report(StartupWarning::StorageUnavailable(e));
        }

        let mut model = Model::default();

        if options.restore {
            let person_table = persistence.load_address_book().unwrap_or_else(|e| {
                report(StartupWarning::AddressBookUnreadable(e));
                PersonTable::new()
            });

            let visibility = persistence.load_preferences().unwrap_or_else(|e| {
                report(StartupWarning::PreferencesUnreadable(e));
                Visibility::default()
            });

            model = Model::new(person_table, visibility);

            log::info!(
                "✅ Successful Restore [Duration: {}ms]",
                now.elapsed().as_millis(),
            );
        }

        log::info!(
            "📀 Data               [Persons: {}]",
            model
                .person_table
                .len()
                .to_formatted_string(&Locale::en)
        );

        Self {
            model,
            persistence,
            database_options: options,
        }
    }

    /// Parses and runs one line of user input
    pub fn execute_line(&mut self, line: &str) -> Result<CommandResult, TrackUpError> {
        log::debug!("Received command: {}", line);

        let command = parse_command(line)?;

        self.execute(&command)
    }

    /// Runs `command`, then persists whatever it changed.
    ///
    /// A failed save does not undo the change in memory.
    pub fn execute(&mut self, command: &Command) -> Result<CommandResult, TrackUpError> {
        let result = command.execute(&mut self.model);

        match &result {
            Ok(_) => log::debug!("✅ Executed: [{}]", command),
            Err(e) => log::debug!("⚠️  Rejected: [{}] {}", command, e),
        }

        let result = result?;

        if command.is_mutation() {
            self.persistence
                .save_address_book(&self.model.person_table)?;
        }

        if let Command::Toggle(_) = command {
            self.persistence.save_preferences(&self.model.visibility)?;
        }

        Ok(result)
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn options(&self) -> &DatabaseOptions {
        &self.database_options
    }

    /// Persists preferences before the process exits
    pub fn shutdown(&mut self) -> StorageResult<()> {
        log::info!("Shutting down, saving preferences");

        self.persistence.save_preferences(&self.model.visibility)
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use crate::{
        database::options::test_directory,
        model::fields::PersonField,
        persistence::storage::StorageEngine,
    };

    use super::*;

    fn options_at(directory: PathBuf) -> DatabaseOptions {
        DatabaseOptions::default()
            .set_storage_engine(StorageEngine::File(directory))
            .set_restore(true)
    }

    fn open_quietly(options: DatabaseOptions) -> Database {
        Database::open(options, |warning| panic!("unexpected warning: {}", warning))
    }

    mod restore {
        use super::*;

        #[test_log::test]
        fn data_survives_a_restart() {
            // Given a database with one added person
            let directory = test_directory();
            let mut database = open_quietly(options_at(directory.clone()));
            database
                .execute_line("add n/Alice Tan p/11111111 e/alice@example.com a/Block 1")
                .unwrap();

            // When it is opened again from the same directory
            let restored = open_quietly(options_at(directory));

            // Then the person is still there
            assert_eq!(
                restored.model().person_table.persons(),
                database.model().person_table.persons()
            );
            assert_eq!(restored.model().person_table.len(), 1);
        }

        #[test_log::test]
        fn corrupt_data_falls_back_to_empty() {
            // Given a data file with one invalid record after a valid one
            let directory = test_directory();
            fs::create_dir_all(&directory).unwrap();
            fs::write(
                directory.join("addressbook.json"),
                r#"{"persons":[{"name":"Amy","tags":[]},{"name":"Bob","email":"not-an-email","tags":[]}]}"#,
            )
            .unwrap();

            // When the database opens
            let mut warnings = vec![];
            let database = Database::open(options_at(directory), |warning| warnings.push(warning));

            // Then nothing is imported and the problem is reported
            assert!(database.model().person_table.is_empty());
            assert_eq!(warnings.len(), 1);
            assert!(matches!(
                warnings[0],
                StartupWarning::AddressBookUnreadable(LoadError::InvalidRecord { position: 2, .. })
            ));
        }

        #[test_log::test]
        fn restore_can_be_disabled() {
            let directory = test_directory();
            let mut database = open_quietly(options_at(directory.clone()));
            database.execute_line("add n/Alice").unwrap();

            let fresh = open_quietly(options_at(directory).set_restore(false));

            assert!(fresh.model().person_table.is_empty());
        }

        #[test_log::test]
        fn visibility_survives_a_restart() {
            let directory = test_directory();
            let mut database = open_quietly(options_at(directory.clone()));
            database.execute_line("toggle email").unwrap();
            database.shutdown().unwrap();

            let restored = open_quietly(options_at(directory));

            assert!(!restored.model().visibility.is_visible(PersonField::Email));
        }
    }

    mod execute {
        use super::*;

        #[test_log::test]
        fn failed_lines_leave_the_model_alone() {
            let mut database = open_quietly(DatabaseOptions::new_test());
            database.execute_line("add n/Alice").unwrap();

            let unknown = database.execute_line("frobnicate").unwrap_err();
            let invalid = database.execute_line("add n/Al!ce").unwrap_err();
            let duplicate = database.execute_line("add n/Alice").unwrap_err();

            assert_eq!(unknown.to_string(), "Unknown command");
            assert!(matches!(invalid, TrackUpError::Parse(ParseError::Validation(_))));
            assert!(matches!(duplicate, TrackUpError::Command(_)));
            assert_eq!(database.model().person_table.len(), 1);
        }

        #[test_log::test]
        fn save_failure_keeps_the_change_in_memory() {
            // Given a data "directory" that is really a file
            let directory = test_directory();
            fs::create_dir_all(directory.parent().unwrap()).unwrap();
            fs::write(&directory, "not a directory").unwrap();

            let mut warnings = vec![];
            let mut database = Database::open(
                DatabaseOptions::default()
                    .set_storage_engine(StorageEngine::File(directory))
                    .set_restore(false),
                |warning| warnings.push(warning),
            );

            // When a person is added
            let result = database.execute_line("add n/Alice");

            // Then saving fails but the person is kept
            assert!(matches!(
                warnings.as_slice(),
                [StartupWarning::StorageUnavailable(_)]
            ));
            assert!(result
                .unwrap_err()
                .to_string()
                .starts_with("Could not save data to file: "));
            assert_eq!(database.model().person_table.len(), 1);
        }

        #[test_log::test]
        fn read_only_commands_do_not_write() {
            let options = DatabaseOptions::new_test();
            let directory = match &options.storage_engine {
                StorageEngine::File(directory) => directory.clone(),
                StorageEngine::Memory => unreachable!(),
            };
            let mut database = open_quietly(options);

            database.execute_line("list").unwrap();
            database.execute_line("help").unwrap();

            assert!(!directory.join("addressbook.json").exists());
        }

        #[test_log::test]
        fn in_memory_database() {
            let mut database = open_quietly(
                DatabaseOptions::default().set_storage_engine(StorageEngine::Memory),
            );

            let result = database.execute_line("add n/Alice").unwrap();

            assert_eq!(result.feedback, "New contact added: Alice");
            assert_eq!(database.options().storage_engine, StorageEngine::Memory);
        }
    }
}
