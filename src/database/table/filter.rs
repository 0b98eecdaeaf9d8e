use std::cmp::Ordering;

use crate::model::{
    fields::{Category, PersonField},
    person::Person,
};

/// Predicate of the filtered view
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PersonFilter {
    #[default]
    All,
    /// Any name word equals any keyword, ignoring case
    NameKeywords(Vec<String>),
    /// Keyword is a substring of any field, ignoring case
    Keyword(String),
    Category(Category),
}

impl PersonFilter {
    pub fn matches(&self, person: &Person) -> bool {
        match self {
            PersonFilter::All => true,
            PersonFilter::NameKeywords(keywords) => person.name().words().any(|word| {
                keywords
                    .iter()
                    .any(|keyword| word.eq_ignore_ascii_case(keyword))
            }),
            PersonFilter::Keyword(keyword) => {
                let keyword = keyword.to_lowercase();

                searchable_text(person)
                    .iter()
                    .any(|text| text.to_lowercase().contains(&keyword))
            }
            PersonFilter::Category(category) => person.has_category(*category),
        }
    }
}

fn searchable_text(person: &Person) -> Vec<String> {
    let mut text = vec![person.name().to_string()];

    text.extend(person.phone().map(ToString::to_string));
    text.extend(person.email().map(ToString::to_string));
    text.extend(person.address().map(ToString::to_string));
    text.push(
        person
            .tags()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" "),
    );
    text.extend(person.category().map(|category| category.to_string()));

    text
}

/// Ascending order by `field`. Absent values sort first.
pub fn compare_by(field: PersonField, a: &Person, b: &Person) -> Ordering {
    match field {
        PersonField::Name => a.name().cmp(b.name()),
        PersonField::Phone => a.phone().cmp(&b.phone()),
        PersonField::Email => a.email().cmp(&b.email()),
        PersonField::Address => a.address().cmp(&b.address()),
        PersonField::Tag => a.tags_display().cmp(&b.tags_display()),
        PersonField::Category => a
            .category()
            .map(|category| category.to_string())
            .cmp(&b.category().map(|category| category.to_string())),
    }
}

/// Positions in `persons` that make up the view, in display order.
///
/// Sorting is stable so equal persons keep their insertion order.
#[tracing::instrument(skip(persons))]
pub fn filter(persons: &[Person], predicate: &PersonFilter, sort: Option<PersonField>) -> Vec<usize> {
    let mut view: Vec<usize> = persons
        .iter()
        .enumerate()
        .filter(|(_, person)| predicate.matches(person))
        .map(|(position, _)| position)
        .collect();

    if let Some(field) = sort {
        view.sort_by(|a, b| compare_by(field, &persons[*a], &persons[*b]));
    }

    view
}
