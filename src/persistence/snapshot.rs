use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    database::table::table::PersonTable,
    model::{
        fields::{Address, Category, Email, Name, Phone, Remark, Tag, ValidationError},
        person::Person,
    },
};

use super::storage::StorageError;

/// Loading is all or nothing, any of these rejects the whole file
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Data file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid person record {position} [{record}]: {reason}")]
    InvalidRecord {
        /// One-based position in the `persons` array
        position: usize,
        record: String,
        reason: ValidationError,
    },

    #[error("Persons list contains duplicate person(s).")]
    DuplicateRecord,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Document persisted as `addressbook.json`
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct AddressBookSnapshot {
    #[serde(default)]
    pub persons: Vec<PersonRecord>,
}

/// Plain string mirror of [`Person`]. Nothing here is trusted until `to_model` validates it.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct PersonRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

pub const MESSAGE_MISSING_NAME: &str = "Person's Name field is missing!";

impl From<&Person> for PersonRecord {
    fn from(person: &Person) -> Self {
        PersonRecord {
            name: Some(person.name().to_string()),
            phone: person.phone().map(ToString::to_string),
            email: person.email().map(ToString::to_string),
            address: person.address().map(ToString::to_string),
            tags: person.tags().iter().map(ToString::to_string).collect(),
            category: person.category().map(|category| category.to_string()),
            remark: person.remark().map(ToString::to_string),
        }
    }
}

impl PersonRecord {
    /// Runs the same field construction the command parsers use
    pub fn to_model(&self) -> Result<Person, ValidationError> {
        let name = self
            .name
            .as_deref()
            .ok_or_else(|| ValidationError::new(MESSAGE_MISSING_NAME))?;

        let person = Person::new(Name::new(name)?)
            .with_phone(self.phone.as_deref().map(Phone::new).transpose()?)
            .with_email(self.email.as_deref().map(Email::new).transpose()?)
            .with_address(self.address.as_deref().map(Address::new).transpose()?)
            .with_tags(
                self.tags
                    .iter()
                    .map(|tag| Tag::new(tag.as_str()))
                    .collect::<Result<_, _>>()?,
            )
            .with_category(self.category.as_deref().map(Category::new).transpose()?)
            .with_remark(
                self.remark
                    .as_deref()
                    .filter(|remark| !remark.is_empty())
                    .map(Remark::new),
            );

        Ok(person)
    }
}

impl From<&PersonTable> for AddressBookSnapshot {
    fn from(table: &PersonTable) -> Self {
        AddressBookSnapshot {
            persons: table.persons().iter().map(PersonRecord::from).collect(),
        }
    }
}

impl AddressBookSnapshot {
    /// Validates every record, then the duplicate invariant over the whole set
    pub fn to_table(&self) -> Result<PersonTable, LoadError> {
        let persons = self
            .persons
            .iter()
            .enumerate()
            .map(|(i, record)| {
                record.to_model().map_err(|reason| LoadError::InvalidRecord {
                    position: i + 1,
                    record: record.name.clone().unwrap_or_else(|| "unnamed".to_string()),
                    reason,
                })
            })
            .collect::<Result<Vec<Person>, LoadError>>()?;

        PersonTable::from_persons(persons).map_err(|_| LoadError::DuplicateRecord)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn alice_record() -> PersonRecord {
        PersonRecord::from(&Person::new_test())
    }

    #[test]
    fn record_mirrors_person() {
        let record = alice_record();

        assert_eq!(record.name.as_deref(), Some("Alice Tan"));
        assert_eq!(record.category.as_deref(), Some("Client"));
        assert_eq!(record.tags, vec!["friends".to_string()]);
        assert_eq!(record.remark, None);
        assert_eq!(record.to_model(), Ok(Person::new_test()));
    }

    #[test]
    fn absent_fields_are_left_out_of_the_json() {
        let record = PersonRecord::from(&Person::new(Name::new("Bob").unwrap()));

        let json = serde_json::to_string(&record).unwrap();

        assert_eq!(json, r#"{"name":"Bob","tags":[]}"#);
    }

    #[test]
    fn lowercase_category_is_accepted() {
        let record = PersonRecord {
            category: Some("partner".to_string()),
            ..alice_record()
        };

        assert_eq!(record.to_model().unwrap().category(), Some(Category::Partner));
    }

    #[test]
    fn missing_name() {
        let record = PersonRecord {
            name: None,
            ..alice_record()
        };

        assert_eq!(record.to_model(), Err(ValidationError::new(MESSAGE_MISSING_NAME)));
    }

    mod snapshot {
        use super::*;

        #[test]
        fn one_invalid_record_rejects_everything() {
            // Given a valid record followed by one with a bad email
            let snapshot = AddressBookSnapshot {
                persons: vec![
                    alice_record(),
                    PersonRecord {
                        name: Some("Bob".to_string()),
                        email: Some("not-an-email".to_string()),
                        ..Default::default()
                    },
                ],
            };

            // When it is converted
            let result = snapshot.to_table();

            // Then the offending record is named
            match result {
                Err(LoadError::InvalidRecord {
                    position, record, reason,
                }) => {
                    assert_eq!(position, 2);
                    assert_eq!(record, "Bob");
                    assert_eq!(reason.message(), Email::MESSAGE_CONSTRAINTS);
                }
                other => panic!("expected an invalid record, got {:?}", other),
            }
        }

        #[test]
        fn duplicates_reject_everything() {
            let duplicate = PersonRecord {
                tags: vec![],
                address: Some("Somewhere else".to_string()),
                ..alice_record()
            };

            let snapshot = AddressBookSnapshot {
                persons: vec![alice_record(), duplicate],
            };

            let result = snapshot.to_table();

            assert!(matches!(result, Err(LoadError::DuplicateRecord)));
        }

        #[test]
        fn table_round_trip() {
            let table = PersonTable::from_persons(vec![
                Person::new_test().with_remark(Some(Remark::new("VIP"))),
                Person::new_test_named("Bob", "222").with_tags(BTreeSet::new()),
            ])
            .unwrap();

            let restored = AddressBookSnapshot::from(&table).to_table().unwrap();

            assert_eq!(restored, table);
        }

        #[test]
        fn missing_persons_key_is_an_empty_book() {
            let snapshot: AddressBookSnapshot = serde_json::from_str("{}").unwrap();

            assert!(snapshot.to_table().unwrap().is_empty());
        }
    }
}
