use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::fields::PersonField;

use super::table::table::PersonTable;

/// Fields hidden from the rendered contact list. Purely presentational, never touches the data.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Visibility {
    #[serde(default)]
    hidden_fields: BTreeSet<PersonField>,
}

impl Visibility {
    pub fn is_visible(&self, field: PersonField) -> bool {
        !self.hidden_fields.contains(&field)
    }

    /// Flips `field`, returns whether it is visible afterwards
    pub fn toggle(&mut self, field: PersonField) -> bool {
        if self.hidden_fields.remove(&field) {
            return true;
        }

        self.hidden_fields.insert(field);
        false
    }

    pub fn hidden_fields(&self) -> impl Iterator<Item = PersonField> + '_ {
        self.hidden_fields.iter().copied()
    }
}

/// Everything a command can act on
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Model {
    pub person_table: PersonTable,
    pub visibility: Visibility,
}

impl Model {
    pub fn new(person_table: PersonTable, visibility: Visibility) -> Self {
        Self {
            person_table,
            visibility,
        }
    }

    /// Drops every person along with the view's filter and sort. Visibility is kept.
    pub fn clear(&mut self) {
        self.person_table = PersonTable::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_starts_visible() {
        let visibility = Visibility::default();

        assert!(visibility.is_visible(PersonField::Name));
        assert!(visibility.is_visible(PersonField::Category));
    }

    #[test]
    fn toggle_flips_back_and_forth() {
        let mut visibility = Visibility::default();

        assert!(!visibility.toggle(PersonField::Email));
        assert!(!visibility.is_visible(PersonField::Email));

        assert!(visibility.toggle(PersonField::Email));
        assert!(visibility.is_visible(PersonField::Email));
    }

    #[test]
    fn visibility_serializes_field_names() {
        let mut visibility = Visibility::default();
        visibility.toggle(PersonField::Phone);

        let json = serde_json::to_string(&visibility).unwrap();

        assert_eq!(json, r#"{"hidden_fields":["phone"]}"#);
        assert_eq!(serde_json::from_str::<Visibility>(&json).unwrap(), visibility);
        assert_eq!(serde_json::from_str::<Visibility>("{}").unwrap(), Visibility::default());
    }
}
