use std::{collections::BTreeSet, fmt};

use strum_macros::{Display, EnumIter, EnumString};

use crate::consts::consts::{
    Index, PREFIX_ADDRESS, PREFIX_CATEGORY, PREFIX_DELETE_ADDRESS, PREFIX_DELETE_EMAIL,
    PREFIX_DELETE_NAME, PREFIX_DELETE_PHONE, PREFIX_DELETE_TAG, PREFIX_EMAIL, PREFIX_NAME,
    PREFIX_PHONE, PREFIX_REMARK, PREFIX_TAG,
};

use super::{
    fields::{Address, Category, Email, Name, PersonField, Phone, Remark, Tag},
    person::Person,
};

/// First word of every command line. Matching is case-sensitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum CommandWord {
    Add,
    Delete,
    DeleteBy,
    Edit,
    Remark,
    Find,
    Search,
    List,
    Sort,
    Clear,
    Toggle,
    Help,
    Exit,
}

impl CommandWord {
    pub fn usage(&self) -> &'static str {
        match self {
            CommandWord::Add => {
                "add: Adds a contact. \
                Parameters: n/NAME [p/PHONE] [e/EMAIL] [a/ADDRESS] [t/TAG]... [-c CATEGORY]\n\
                Example: add n/John Doe p/98765432 e/johnd@example.com a/311, Clementi Ave 2 t/friends -c Client"
            }
            CommandWord::Delete => {
                "delete: Deletes the contact identified by the index number used in the displayed list.\n\
                Parameters: INDEX (must be a positive integer)\n\
                Example: delete 1"
            }
            CommandWord::DeleteBy => {
                "delete-by: Deletes the contact matching every given field.\n\
                Parameters: [-n NAME] [-p PHONE] [-e EMAIL] [-a ADDRESS] [-t TAG] (at least one)\n\
                Example: delete-by -n John Doe"
            }
            CommandWord::Edit => {
                "edit: Edits the contact identified by the index number used in the displayed list. \
                Existing values will be overwritten by the input values, an empty value clears an optional field.\n\
                Parameters: INDEX (must be a positive integer) \
                [n/NAME] [p/PHONE] [e/EMAIL] [a/ADDRESS] [t/TAG]... [-c CATEGORY]\n\
                Example: edit 1 p/91234567 e/johndoe@example.com"
            }
            CommandWord::Remark => {
                "remark: Sets the remark of the contact identified by the index number used in the displayed list. \
                An empty remark removes it.\n\
                Parameters: INDEX (must be a positive integer) r/REMARK\n\
                Example: remark 1 r/Likes to swim."
            }
            CommandWord::Find => {
                "find: Finds persons whose names contain any of the given keywords.\n\
                Parameters: KEYWORD [MORE_KEYWORDS]...\n\
                Example: find alice bob charlie"
            }
            CommandWord::Search => {
                "search: Finds and lists all persons whose name, phone, email, address, tags \
                or category contain the given keyword.\n\
                Parameters: KEYWORD\n\
                Example: search John"
            }
            CommandWord::List => {
                "list: Lists all contacts, optionally only those in a category.\n\
                Parameters: [-c CATEGORY]\n\
                Example: list -c Client"
            }
            CommandWord::Sort => {
                "sort: Sorts the displayed list by a field.\n\
                Parameters: FIELD (one of name, phone, email, address, tag, category)\n\
                Example: sort name"
            }
            CommandWord::Clear => "clear: Clears all contacts from TrackUp.\nExample: clear",
            CommandWord::Toggle => {
                "toggle: Toggle the given field in the address book UI. \
                Parameters: FIELD (one of name, phone, email, address, tag, category)\n\
                Example: toggle name"
            }
            CommandWord::Help => {
                "help: Shows program usage instructions.\n\
                Parameters: [COMMAND]\n\
                Example: help add"
            }
            CommandWord::Exit => "exit: Exits the program.\nExample: exit",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CommandWord::Add => "Adds a new contact",
            CommandWord::Delete => "Removes a contact by its index",
            CommandWord::DeleteBy => "Removes the contact matching the given fields",
            CommandWord::Edit => "Edits a contact",
            CommandWord::Remark => "Sets a free text remark on a contact",
            CommandWord::Find => "Finds contacts by name",
            CommandWord::Search => "Finds contacts by any field",
            CommandWord::List => "Displays stored contacts",
            CommandWord::Sort => "Sorts the displayed contacts",
            CommandWord::Clear => "Removes every contact",
            CommandWord::Toggle => "Shows or hides a field",
            CommandWord::Help => "Shows details on available commands",
            CommandWord::Exit => "Exits the program",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateStatement<T> {
    Set(T),
    Unset,
    NoChanges,
}

impl<T> Default for UpdateStatement<T> {
    fn default() -> Self {
        UpdateStatement::NoChanges
    }
}

impl<T: Clone> UpdateStatement<T> {
    fn apply(&self, current: Option<&T>) -> Option<T> {
        match self {
            UpdateStatement::Set(value) => Some(value.clone()),
            UpdateStatement::Unset => None,
            UpdateStatement::NoChanges => current.cloned(),
        }
    }

    fn is_change(&self) -> bool {
        !matches!(self, UpdateStatement::NoChanges)
    }
}

/// Partial update for `edit`, only supplied fields are overridden
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdatePersonData {
    /// The name can be replaced but never removed
    pub name: Option<Name>,
    pub phone: UpdateStatement<Phone>,
    pub email: UpdateStatement<Email>,
    pub address: UpdateStatement<Address>,
    /// Replaces the whole tag set, an empty set clears it
    pub tags: Option<BTreeSet<Tag>>,
    pub category: UpdateStatement<Category>,
}

impl UpdatePersonData {
    pub fn is_any_field_edited(&self) -> bool {
        self.name.is_some()
            || self.phone.is_change()
            || self.email.is_change()
            || self.address.is_change()
            || self.tags.is_some()
            || self.category.is_change()
    }

    pub fn apply(&self, person: &Person) -> Person {
        person
            .clone()
            .with_name(self.name.clone().unwrap_or_else(|| person.name().clone()))
            .with_phone(self.phone.apply(person.phone()))
            .with_email(self.email.apply(person.email()))
            .with_address(self.address.apply(person.address()))
            .with_tags(self.tags.clone().unwrap_or_else(|| person.tags().clone()))
            .with_category(self.category.apply(person.category().as_ref()))
    }
}

/// Field values a person must all match to be removed by `delete-by`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeleteCriteria {
    pub name: Option<Name>,
    pub phone: Option<Phone>,
    pub email: Option<Email>,
    pub address: Option<Address>,
    pub tag: Option<Tag>,
}

impl DeleteCriteria {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.tag.is_none()
    }

    pub fn matches(&self, person: &Person) -> bool {
        self.name.as_ref().map_or(true, |name| person.name() == name)
            && self
                .phone
                .as_ref()
                .map_or(true, |phone| person.phone() == Some(phone))
            && self
                .email
                .as_ref()
                .map_or(true, |email| person.email() == Some(email))
            && self
                .address
                .as_ref()
                .map_or(true, |address| person.address() == Some(address))
            && self
                .tag
                .as_ref()
                .map_or(true, |tag| person.tags().contains(tag))
    }
}

impl fmt::Display for DeleteCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            self.name.as_ref().map(|v| format!("{} {}", PREFIX_DELETE_NAME, v)),
            self.phone.as_ref().map(|v| format!("{} {}", PREFIX_DELETE_PHONE, v)),
            self.email.as_ref().map(|v| format!("{} {}", PREFIX_DELETE_EMAIL, v)),
            self.address.as_ref().map(|v| format!("{} {}", PREFIX_DELETE_ADDRESS, v)),
            self.tag.as_ref().map(|v| format!("{} {}", PREFIX_DELETE_TAG, v)),
        ]
        .into_iter()
        .flatten()
        .collect();

        f.write_str(&parts.join(" "))
    }
}

/// A fully validated request. Every field is fixed at parse time, `execute` is the only behaviour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Add(Person),
    Delete(Index),
    DeleteBy(DeleteCriteria),
    Edit(Index, UpdatePersonData),
    /// `None` removes the remark
    Remark(Index, Option<Remark>),
    /// Whole-word, case-insensitive match on any name word
    Find(Vec<String>),
    /// Case-insensitive substring match across every field
    Search(String),
    List(Option<Category>),
    Sort(PersonField),
    Clear,
    /// Field name is checked on execution
    Toggle(String),
    Help(Option<CommandWord>),
    Exit,
}

impl Command {
    pub fn command_word(&self) -> CommandWord {
        match self {
            Command::Add(_) => CommandWord::Add,
            Command::Delete(_) => CommandWord::Delete,
            Command::DeleteBy(_) => CommandWord::DeleteBy,
            Command::Edit(_, _) => CommandWord::Edit,
            Command::Remark(_, _) => CommandWord::Remark,
            Command::Find(_) => CommandWord::Find,
            Command::Search(_) => CommandWord::Search,
            Command::List(_) => CommandWord::List,
            Command::Sort(_) => CommandWord::Sort,
            Command::Clear => CommandWord::Clear,
            Command::Toggle(_) => CommandWord::Toggle,
            Command::Help(_) => CommandWord::Help,
            Command::Exit => CommandWord::Exit,
        }
    }

    /// Commands that change the person collection and must be persisted afterwards
    pub fn is_mutation(&self) -> bool {
        match self {
            Command::Add(_)
            | Command::Delete(_)
            | Command::DeleteBy(_)
            | Command::Edit(_, _)
            | Command::Remark(_, _)
            | Command::Clear => true,
            Command::Find(_)
            | Command::Search(_)
            | Command::List(_)
            | Command::Sort(_)
            | Command::Toggle(_)
            | Command::Help(_)
            | Command::Exit => false,
        }
    }

    /// Commands that change what the filtered view shows
    pub fn changes_view(&self) -> bool {
        matches!(
            self,
            Command::Find(_) | Command::Search(_) | Command::List(_) | Command::Sort(_)
        )
    }
}

fn write_optional<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    prefix: impl fmt::Display,
    update: &UpdateStatement<T>,
) -> fmt::Result {
    match update {
        UpdateStatement::Set(value) => write!(f, " {}{}", prefix, value),
        UpdateStatement::Unset => write!(f, " {}", prefix),
        UpdateStatement::NoChanges => Ok(()),
    }
}

/// Canonical command text, parsing it gives back an equal command
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command_word())?;

        match self {
            Command::Add(person) => {
                write!(f, " {}{}", PREFIX_NAME, person.name())?;

                if let Some(phone) = person.phone() {
                    write!(f, " {}{}", PREFIX_PHONE, phone)?;
                }
                if let Some(email) = person.email() {
                    write!(f, " {}{}", PREFIX_EMAIL, email)?;
                }
                if let Some(address) = person.address() {
                    write!(f, " {}{}", PREFIX_ADDRESS, address)?;
                }
                for tag in person.tags() {
                    write!(f, " {}{}", PREFIX_TAG, tag)?;
                }
                if let Some(category) = person.category() {
                    write!(f, " {} {}", PREFIX_CATEGORY, category)?;
                }

                Ok(())
            }
            Command::Delete(index) => write!(f, " {}", index),
            Command::DeleteBy(criteria) => write!(f, " {}", criteria),
            Command::Edit(index, update) => {
                write!(f, " {}", index)?;

                if let Some(name) = &update.name {
                    write!(f, " {}{}", PREFIX_NAME, name)?;
                }
                write_optional(f, PREFIX_PHONE, &update.phone)?;
                write_optional(f, PREFIX_EMAIL, &update.email)?;
                write_optional(f, PREFIX_ADDRESS, &update.address)?;

                match &update.tags {
                    Some(tags) if tags.is_empty() => write!(f, " {}", PREFIX_TAG)?,
                    Some(tags) => {
                        for tag in tags {
                            write!(f, " {}{}", PREFIX_TAG, tag)?;
                        }
                    }
                    None => {}
                }

                write_optional(f, format!("{} ", PREFIX_CATEGORY), &update.category)
            }
            Command::Remark(index, remark) => {
                write!(f, " {} {}", index, PREFIX_REMARK)?;

                match remark {
                    Some(remark) => write!(f, "{}", remark),
                    None => Ok(()),
                }
            }
            Command::Find(keywords) => write!(f, " {}", keywords.join(" ")),
            Command::Search(keyword) => write!(f, " {}", keyword),
            Command::List(Some(category)) => write!(f, " {} {}", PREFIX_CATEGORY, category),
            Command::Sort(field) => write!(f, " {}", field),
            Command::Toggle(field) => write!(f, " {}", field),
            Command::Help(Some(word)) => write!(f, " {}", word),
            Command::List(None) | Command::Clear | Command::Help(None) | Command::Exit => Ok(()),
        }
    }
}

/// Outcome of a successful command
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandResult {
    pub feedback: String,
    pub show_help: bool,
    pub exit: bool,
}

impl CommandResult {
    pub fn new(feedback: impl Into<String>) -> Self {
        CommandResult {
            feedback: feedback.into(),
            show_help: false,
            exit: false,
        }
    }

    pub fn help(feedback: impl Into<String>) -> Self {
        CommandResult {
            show_help: true,
            ..CommandResult::new(feedback)
        }
    }

    pub fn exit(feedback: impl Into<String>) -> Self {
        CommandResult {
            exit: true,
            ..CommandResult::new(feedback)
        }
    }
}
