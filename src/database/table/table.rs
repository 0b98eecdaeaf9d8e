use thiserror::Error;

use crate::{
    consts::consts::{Index, MESSAGE_INVALID_PERSON_DISPLAYED_INDEX},
    model::{fields::PersonField, person::Person},
};

use super::filter::{filter, PersonFilter};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplyErrors {
    // Constraints
    #[error("This person already exists in the address book")]
    DuplicatePerson,

    // Index into the filtered view
    #[error("{}", MESSAGE_INVALID_PERSON_DISPLAYED_INDEX)]
    InvalidIndex(Index),
}

/// Canonical, insertion ordered collection of persons plus the filtered view over it.
///
/// The view is recomputed inside every mutating call, so it always reflects `person_rows`.
#[derive(Debug, Default, Clone)]
pub struct PersonTable {
    person_rows: Vec<Person>,
    filter: PersonFilter,
    sort: Option<PersonField>,
    view: Vec<usize>,
}

impl PersonTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from already validated persons. Duplicates are rejected.
    pub fn from_persons(persons: Vec<Person>) -> Result<Self, ApplyErrors> {
        let mut table = PersonTable::new();

        for person in persons {
            table.add(person)?;
        }

        Ok(table)
    }

    pub fn persons(&self) -> &[Person] {
        &self.person_rows
    }

    pub fn len(&self) -> usize {
        self.person_rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.person_rows.is_empty()
    }

    /// Weak identity check against every stored person
    pub fn has_person(&self, person: &Person) -> bool {
        self.person_rows
            .iter()
            .any(|existing| existing.is_same_person(person))
    }

    pub fn add(&mut self, person: Person) -> Result<(), ApplyErrors> {
        if self.has_person(&person) {
            return Err(ApplyErrors::DuplicatePerson);
        }

        self.person_rows.push(person);
        self.refresh_view();

        Ok(())
    }

    /// Removes the person shown at `index` in the filtered view
    pub fn remove(&mut self, index: Index) -> Result<Person, ApplyErrors> {
        let position = self.position_of(index)?;

        let removed = self.person_rows.remove(position);
        self.refresh_view();

        Ok(removed)
    }

    /// Replaces the person shown at `index`. The replacement may keep its own identity
    /// but must not collide with any other stored person.
    pub fn replace(&mut self, index: Index, person: Person) -> Result<Person, ApplyErrors> {
        let position = self.position_of(index)?;

        let collides = self
            .person_rows
            .iter()
            .enumerate()
            .any(|(other, existing)| other != position && existing.is_same_person(&person));

        if collides {
            return Err(ApplyErrors::DuplicatePerson);
        }

        let previous = std::mem::replace(&mut self.person_rows[position], person);
        self.refresh_view();

        Ok(previous)
    }

    pub fn filtered_person(&self, index: Index) -> Result<&Person, ApplyErrors> {
        let position = self.position_of(index)?;

        Ok(&self.person_rows[position])
    }

    pub fn filtered_persons(&self) -> impl Iterator<Item = &Person> {
        self.view.iter().map(|position| &self.person_rows[*position])
    }

    pub fn filtered_len(&self) -> usize {
        self.view.len()
    }

    pub fn update_filter(&mut self, filter: PersonFilter) {
        self.filter = filter;
        self.refresh_view();
    }

    pub fn update_sort(&mut self, sort: Option<PersonField>) {
        self.sort = sort;
        self.refresh_view();
    }

    pub fn sort(&self) -> Option<PersonField> {
        self.sort
    }

    fn position_of(&self, index: Index) -> Result<usize, ApplyErrors> {
        self.view
            .get(index.zero_based())
            .copied()
            .ok_or(ApplyErrors::InvalidIndex(index))
    }

    fn refresh_view(&mut self) {
        self.view = filter(&self.person_rows, &self.filter, self.sort);
    }
}

impl PartialEq for PersonTable {
    /// Two tables are equal when they hold the same persons in the same order
    fn eq(&self, other: &Self) -> bool {
        self.person_rows == other.person_rows
    }
}
