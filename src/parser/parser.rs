use std::collections::BTreeSet;

use thiserror::Error;

use crate::{
    consts::consts::{
        invalid_command_format, Index, MESSAGE_DUPLICATE_FIELDS, MESSAGE_UNKNOWN_COMMAND,
        PREFIX_ADDRESS, PREFIX_CATEGORY, PREFIX_DELETE_ADDRESS, PREFIX_DELETE_EMAIL,
        PREFIX_DELETE_NAME, PREFIX_DELETE_PHONE, PREFIX_DELETE_TAG, PREFIX_EMAIL, PREFIX_NAME,
        PREFIX_PHONE, PREFIX_REMARK, PREFIX_TAG,
    },
    model::{
        command::{Command, CommandWord, DeleteCriteria, UpdatePersonData, UpdateStatement},
        fields::{Address, Category, Email, Name, PersonField, Phone, Remark, Tag, ValidationError},
        person::Person,
    },
};

use super::tokenizer::{tokenize, ArgumentMap, Prefix};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{}", MESSAGE_UNKNOWN_COMMAND)]
    UnknownCommand,
    /// Carries the usage of the command that was malformed
    #[error("{}", invalid_command_format(.0))]
    InvalidCommandFormat(&'static str),
    #[error("{}{}", MESSAGE_DUPLICATE_FIELDS, join_prefixes(.0))]
    DuplicatePrefixes(Vec<Prefix>),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

fn join_prefixes(prefixes: &[Prefix]) -> String {
    prefixes
        .iter()
        .map(Prefix::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

const PERSON_PREFIXES: [Prefix; 6] = [
    PREFIX_NAME,
    PREFIX_PHONE,
    PREFIX_EMAIL,
    PREFIX_ADDRESS,
    PREFIX_TAG,
    PREFIX_CATEGORY,
];

/// `t/` is the only repeatable person prefix
const SINGLE_VALUED_PERSON_PREFIXES: [Prefix; 5] = [
    PREFIX_NAME,
    PREFIX_PHONE,
    PREFIX_EMAIL,
    PREFIX_ADDRESS,
    PREFIX_CATEGORY,
];

const DELETE_BY_PREFIXES: [Prefix; 5] = [
    PREFIX_DELETE_NAME,
    PREFIX_DELETE_PHONE,
    PREFIX_DELETE_EMAIL,
    PREFIX_DELETE_ADDRESS,
    PREFIX_DELETE_TAG,
];

/// Parses one line of user input into a command.
///
/// The first whitespace delimited word selects the command, case-sensitively.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();

    if line.is_empty() {
        return Err(ParseError::InvalidCommandFormat(CommandWord::Help.usage()));
    }

    let (word, args) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    let command_word: CommandWord = word.parse().map_err(|_| ParseError::UnknownCommand)?;

    match command_word {
        CommandWord::Add => parse_add(args),
        CommandWord::Delete => parse_delete(args),
        CommandWord::DeleteBy => parse_delete_by(args),
        CommandWord::Edit => parse_edit(args),
        CommandWord::Remark => parse_remark(args),
        CommandWord::Find => parse_find(args),
        CommandWord::Search => parse_search(args),
        CommandWord::List => parse_list(args),
        CommandWord::Sort => parse_sort(args),
        CommandWord::Clear => parse_no_arguments(args, Command::Clear),
        CommandWord::Toggle => parse_toggle(args),
        CommandWord::Help => parse_help(args),
        CommandWord::Exit => parse_no_arguments(args, Command::Exit),
    }
}

fn usage_error(word: CommandWord) -> ParseError {
    ParseError::InvalidCommandFormat(word.usage())
}

fn ensure_single_valued(map: &ArgumentMap, prefixes: &[Prefix]) -> Result<(), ParseError> {
    let duplicated = map.duplicated_prefixes(prefixes);

    if !duplicated.is_empty() {
        return Err(ParseError::DuplicatePrefixes(duplicated));
    }

    Ok(())
}

fn parse_index(preamble: &str, word: CommandWord) -> Result<Index, ParseError> {
    Index::try_from(preamble).map_err(|_| usage_error(word))
}

fn parse_optional<T>(
    value: Option<&str>,
    construct: impl Fn(&str) -> Result<T, ValidationError>,
) -> Result<Option<T>, ValidationError> {
    value.map(construct).transpose()
}

/// Absent leaves the field alone, an empty value clears it
fn parse_update<T>(
    value: Option<&str>,
    construct: impl Fn(&str) -> Result<T, ValidationError>,
) -> Result<UpdateStatement<T>, ValidationError> {
    match value {
        None => Ok(UpdateStatement::NoChanges),
        Some("") => Ok(UpdateStatement::Unset),
        Some(value) => Ok(UpdateStatement::Set(construct(value)?)),
    }
}

fn parse_tags(values: &[String]) -> Result<BTreeSet<Tag>, ValidationError> {
    values.iter().map(|value| Tag::new(value.as_str())).collect()
}

fn parse_add(args: &str) -> Result<Command, ParseError> {
    let map = tokenize(args, &PERSON_PREFIXES);

    if !map.is_present(PREFIX_NAME) || !map.preamble().is_empty() {
        return Err(usage_error(CommandWord::Add));
    }

    ensure_single_valued(&map, &SINGLE_VALUED_PERSON_PREFIXES)?;

    let name = Name::new(map.value(PREFIX_NAME).unwrap_or_default())?;
    let phone = parse_optional(map.value(PREFIX_PHONE), |v| Phone::new(v))?;
    let email = parse_optional(map.value(PREFIX_EMAIL), |v| Email::new(v))?;
    let address = parse_optional(map.value(PREFIX_ADDRESS), |v| Address::new(v))?;
    let tags = parse_tags(map.all_values(PREFIX_TAG))?;
    let category = parse_optional(map.value(PREFIX_CATEGORY), Category::new)?;

    let person = Person::new(name)
        .with_phone(phone)
        .with_email(email)
        .with_address(address)
        .with_tags(tags)
        .with_category(category);

    Ok(Command::Add(person))
}

fn parse_delete(args: &str) -> Result<Command, ParseError> {
    let index = parse_index(args, CommandWord::Delete)?;

    Ok(Command::Delete(index))
}

fn parse_delete_by(args: &str) -> Result<Command, ParseError> {
    let map = tokenize(args, &DELETE_BY_PREFIXES);

    let any_present = DELETE_BY_PREFIXES
        .iter()
        .any(|prefix| map.is_present(*prefix));

    if !any_present || !map.preamble().is_empty() {
        return Err(usage_error(CommandWord::DeleteBy));
    }

    ensure_single_valued(&map, &DELETE_BY_PREFIXES)?;

    let criteria = DeleteCriteria {
        name: parse_optional(map.value(PREFIX_DELETE_NAME), |v| Name::new(v))?,
        phone: parse_optional(map.value(PREFIX_DELETE_PHONE), |v| Phone::new(v))?,
        email: parse_optional(map.value(PREFIX_DELETE_EMAIL), |v| Email::new(v))?,
        address: parse_optional(map.value(PREFIX_DELETE_ADDRESS), |v| Address::new(v))?,
        tag: parse_optional(map.value(PREFIX_DELETE_TAG), |v| Tag::new(v))?,
    };

    Ok(Command::DeleteBy(criteria))
}

fn parse_edit(args: &str) -> Result<Command, ParseError> {
    let map = tokenize(args, &PERSON_PREFIXES);

    let index = parse_index(map.preamble(), CommandWord::Edit)?;

    ensure_single_valued(&map, &SINGLE_VALUED_PERSON_PREFIXES)?;

    let tag_values = map.all_values(PREFIX_TAG);
    let tags = match tag_values {
        [] => None,
        [only] if only.is_empty() => Some(BTreeSet::new()),
        values => Some(parse_tags(values)?),
    };

    let update = UpdatePersonData {
        name: parse_optional(map.value(PREFIX_NAME), |v| Name::new(v))?,
        phone: parse_update(map.value(PREFIX_PHONE), |v| Phone::new(v))?,
        email: parse_update(map.value(PREFIX_EMAIL), |v| Email::new(v))?,
        address: parse_update(map.value(PREFIX_ADDRESS), |v| Address::new(v))?,
        tags,
        category: parse_update(map.value(PREFIX_CATEGORY), Category::new)?,
    };

    Ok(Command::Edit(index, update))
}

fn parse_remark(args: &str) -> Result<Command, ParseError> {
    let map = tokenize(args, &[PREFIX_REMARK]);

    let index = parse_index(map.preamble(), CommandWord::Remark)?;

    let Some(text) = map.value(PREFIX_REMARK) else {
        return Err(usage_error(CommandWord::Remark));
    };

    ensure_single_valued(&map, &[PREFIX_REMARK])?;

    let remark = (!text.is_empty()).then(|| Remark::new(text));

    Ok(Command::Remark(index, remark))
}

fn parse_find(args: &str) -> Result<Command, ParseError> {
    let keywords: Vec<String> = args.split_whitespace().map(str::to_string).collect();

    if keywords.is_empty() {
        return Err(usage_error(CommandWord::Find));
    }

    for keyword in &keywords {
        Name::new(keyword.as_str())?;
    }

    Ok(Command::Find(keywords))
}

fn parse_search(args: &str) -> Result<Command, ParseError> {
    let keyword = args.trim();

    if keyword.is_empty() {
        return Err(usage_error(CommandWord::Search));
    }

    Ok(Command::Search(keyword.to_string()))
}

fn parse_list(args: &str) -> Result<Command, ParseError> {
    let map = tokenize(args, &[PREFIX_CATEGORY]);

    if !map.preamble().is_empty() {
        return Err(usage_error(CommandWord::List));
    }

    ensure_single_valued(&map, &[PREFIX_CATEGORY])?;

    let category = parse_optional(map.value(PREFIX_CATEGORY), Category::new)?;

    Ok(Command::List(category))
}

fn parse_sort(args: &str) -> Result<Command, ParseError> {
    let field: PersonField = args
        .trim()
        .parse()
        .map_err(|_| usage_error(CommandWord::Sort))?;

    Ok(Command::Sort(field))
}

fn parse_toggle(args: &str) -> Result<Command, ParseError> {
    let field = args.trim();

    if field.is_empty() || field.contains(char::is_whitespace) {
        return Err(usage_error(CommandWord::Toggle));
    }

    Ok(Command::Toggle(field.to_string()))
}

fn parse_help(args: &str) -> Result<Command, ParseError> {
    let word = args.trim();

    if word.is_empty() {
        return Ok(Command::Help(None));
    }

    let word: CommandWord = word.parse().map_err(|_| usage_error(CommandWord::Help))?;

    Ok(Command::Help(Some(word)))
}

fn parse_no_arguments(args: &str, command: Command) -> Result<Command, ParseError> {
    if !args.trim().is_empty() {
        return Err(usage_error(command.command_word()));
    }

    Ok(command)
}
