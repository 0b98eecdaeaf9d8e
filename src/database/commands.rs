use strum::IntoEnumIterator;
use thiserror::Error;

use crate::{
    consts::consts::{invalid_command_format, persons_listed_overview, Index, MESSAGE_NO_MATCH},
    model::{
        command::{Command, CommandResult, CommandWord, DeleteCriteria, UpdatePersonData},
        fields::{Category, PersonField, Remark},
        person::Person,
    },
};

use super::{
    model::Model,
    table::{filter::PersonFilter, table::ApplyErrors},
};

/// A well formed command that cannot be carried out against the current model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error(transparent)]
    Apply(#[from] ApplyErrors),

    #[error("No contact matches the given criteria")]
    PersonNotFound,

    #[error("At least one field to edit must be provided.")]
    NotEdited,

    /// Carries the usage of the command
    #[error("{}", invalid_command_format(.0))]
    InvalidCommandFormat(&'static str),
}

pub type CommandOutcome = Result<CommandResult, CommandError>;

impl Command {
    /// Runs the command against `model`. A failing command leaves `model` untouched.
    pub fn execute(&self, model: &mut Model) -> CommandOutcome {
        match self {
            Command::Add(person) => add(model, person),
            Command::Delete(index) => delete(model, *index),
            Command::DeleteBy(criteria) => delete_by(model, criteria),
            Command::Edit(index, update) => edit(model, *index, update),
            Command::Remark(index, remark) => remark_person(model, *index, remark),
            Command::Find(keywords) => {
                model
                    .person_table
                    .update_filter(PersonFilter::NameKeywords(keywords.clone()));

                Ok(CommandResult::new(listed_overview(model)))
            }
            Command::Search(keyword) => {
                model
                    .person_table
                    .update_filter(PersonFilter::Keyword(keyword.clone()));

                if model.person_table.filtered_len() == 0 {
                    return Ok(CommandResult::new(MESSAGE_NO_MATCH));
                }

                Ok(CommandResult::new(format!(
                    "Listed persons matching: {}",
                    keyword
                )))
            }
            Command::List(category) => Ok(list(model, *category)),
            Command::Sort(field) => {
                model.person_table.update_sort(Some(*field));

                Ok(CommandResult::new(format!("Sorted persons by {}", field)))
            }
            Command::Clear => {
                model.clear();

                Ok(CommandResult::new("TrackUp's contact list has been cleared!"))
            }
            Command::Toggle(field) => toggle(model, field),
            Command::Help(word) => Ok(help(*word)),
            Command::Exit => Ok(CommandResult::exit("Exiting TrackUp as requested ...")),
        }
    }
}

fn add(model: &mut Model, person: &Person) -> CommandOutcome {
    model.person_table.add(person.clone())?;

    Ok(CommandResult::new(format!("New contact added: {}", person)))
}

fn delete(model: &mut Model, index: Index) -> CommandOutcome {
    let removed = model.person_table.remove(index)?;

    Ok(CommandResult::new(format!("Deleted Person: {}", removed)))
}

fn delete_by(model: &mut Model, criteria: &DeleteCriteria) -> CommandOutcome {
    let candidates: Vec<Index> = model
        .person_table
        .filtered_persons()
        .enumerate()
        .filter(|(_, person)| criteria.matches(person))
        .map(|(position, _)| Index::from_zero_based(position))
        .collect();

    match candidates.as_slice() {
        [] => Err(CommandError::PersonNotFound),
        [index] => delete(model, *index),
        many => {
            let listing: Vec<String> = many
                .iter()
                .filter_map(|index| model.person_table.filtered_person(*index).ok())
                .enumerate()
                .map(|(i, person)| format!("{}. {}", i + 1, person))
                .collect();

            Ok(CommandResult::new(format!(
                "Multiple contacts match {}. Please be more specific:\n{}",
                criteria,
                listing.join("\n")
            )))
        }
    }
}

fn edit(model: &mut Model, index: Index, update: &UpdatePersonData) -> CommandOutcome {
    if !update.is_any_field_edited() {
        return Err(CommandError::NotEdited);
    }

    let edited = update.apply(model.person_table.filtered_person(index)?);

    model.person_table.replace(index, edited.clone())?;

    Ok(CommandResult::new(format!("Edited Person: {}", edited)))
}

fn remark_person(model: &mut Model, index: Index, remark: &Option<Remark>) -> CommandOutcome {
    let remarked = model
        .person_table
        .filtered_person(index)?
        .clone()
        .with_remark(remark.clone());

    model.person_table.replace(index, remarked.clone())?;

    let feedback = match remark {
        Some(_) => format!("Added remark to Person: {}", remarked),
        None => format!("Removed remark from Person: {}", remarked),
    };

    Ok(CommandResult::new(feedback))
}

fn listed_overview(model: &Model) -> String {
    match model.person_table.filtered_len() {
        0 => MESSAGE_NO_MATCH.to_string(),
        count => persons_listed_overview(count),
    }
}

fn list(model: &mut Model, category: Option<Category>) -> CommandResult {
    match category {
        Some(category) => {
            model
                .person_table
                .update_filter(PersonFilter::Category(category));

            CommandResult::new(format!("Listed all persons in category: {}", category))
        }
        None => {
            model.person_table.update_filter(PersonFilter::All);

            CommandResult::new("Listed all persons")
        }
    }
}

fn toggle(model: &mut Model, field: &str) -> CommandOutcome {
    let field: PersonField = field
        .parse()
        .map_err(|_| CommandError::InvalidCommandFormat(CommandWord::Toggle.usage()))?;

    let message = if model.visibility.toggle(field) {
        format!("Field unhidden: {}", field)
    } else {
        format!("Field hidden: {}", field)
    };

    Ok(CommandResult::new(message))
}

fn help(word: Option<CommandWord>) -> CommandResult {
    match word {
        Some(word) => CommandResult::new(format!("Command: {}\nUsage: {}", word, word.usage())),
        None => {
            let overview: Vec<String> = CommandWord::iter()
                .map(|word| format!("{:<10} {}", word.to_string(), word.description()))
                .collect();

            CommandResult::help(format!("Available commands:\n{}", overview.join("\n")))
        }
    }
}
