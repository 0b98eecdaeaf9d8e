use std::{fmt, sync::OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

/// A field value did not satisfy its format constraint, carries the constraint message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[[:alnum:]][[:alnum:] ]*$").unwrap())
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{3,}$").unwrap())
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^[[:alnum:]]+([+_.\-][[:alnum:]]+)*",
            r"@([[:alnum:]]+(-[[:alnum:]]+)*\.)*",
            r"([[:alnum:]]+(-[[:alnum:]]+)*){2,}$"
        ))
        .unwrap()
    })
}

fn address_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\S.*$").unwrap())
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[[:alnum:]]+$").unwrap())
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub const MESSAGE_CONSTRAINTS: &'static str =
        "Names should only contain alphanumeric characters and spaces, and it should not be blank";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();

        if !Self::is_valid(&value) {
            return Err(ValidationError::new(Self::MESSAGE_CONSTRAINTS));
        }

        Ok(Self(value))
    }

    pub fn is_valid(value: &str) -> bool {
        name_regex().is_match(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whitespace separated words, used for keyword matching
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Phone(String);

impl Phone {
    pub const MESSAGE_CONSTRAINTS: &'static str =
        "Phone numbers should only contain numbers, and it should be at least 3 digits long";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();

        if !Self::is_valid(&value) {
            return Err(ValidationError::new(Self::MESSAGE_CONSTRAINTS));
        }

        Ok(Self(value))
    }

    pub fn is_valid(value: &str) -> bool {
        phone_regex().is_match(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Email(String);

impl Email {
    pub const MESSAGE_CONSTRAINTS: &'static str = "Emails should be of the format local-part@domain \
        and adhere to the following constraints:\n\
        1. The local-part should only contain alphanumeric characters and these special characters, \
        excluding the parentheses, (+_.-). The local-part may not start or end with any special characters.\n\
        2. This is followed by a '@' and then a domain name. The domain name is made up of domain labels \
        separated by periods.\n\
        The domain name must:\n    \
        - end with a domain label at least 2 characters long\n    \
        - have each domain label start and end with alphanumeric characters\n    \
        - have each domain label consist of alphanumeric characters, separated only by hyphens, if any.";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();

        if !Self::is_valid(&value) {
            return Err(ValidationError::new(Self::MESSAGE_CONSTRAINTS));
        }

        Ok(Self(value))
    }

    pub fn is_valid(value: &str) -> bool {
        email_regex().is_match(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(String);

impl Address {
    pub const MESSAGE_CONSTRAINTS: &'static str =
        "Addresses can take any values, and it should not be blank";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();

        if !Self::is_valid(&value) {
            return Err(ValidationError::new(Self::MESSAGE_CONSTRAINTS));
        }

        Ok(Self(value))
    }

    pub fn is_valid(value: &str) -> bool {
        address_regex().is_match(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String);

impl Tag {
    pub const MESSAGE_CONSTRAINTS: &'static str = "Tags names should be alphanumeric";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();

        if !Self::is_valid(&value) {
            return Err(ValidationError::new(Self::MESSAGE_CONSTRAINTS));
        }

        Ok(Self(value))
    }

    pub fn is_valid(value: &str) -> bool {
        tag_regex().is_match(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Contact category. Parsing ignores ASCII case, so `client` and `CLIENT` are the same category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, Display, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    Client,
    Investor,
    Partner,
    Other,
}

impl Category {
    pub const MESSAGE_CONSTRAINTS: &'static str =
        "Category should be one of: Client, Investor, Partner, Other";

    pub fn new(value: &str) -> Result<Self, ValidationError> {
        value
            .parse()
            .map_err(|_| ValidationError::new(Self::MESSAGE_CONSTRAINTS))
    }
}

/// Free text note, never validated
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Remark(String);

impl Remark {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Person fields addressable by name from the command line (`toggle`, `sort`)
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumString,
    Display,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PersonField {
    Name,
    Phone,
    Email,
    Address,
    Tag,
    Category,
}

macro_rules! impl_display {
    ($($field:ty),*) => {
        $(
            impl fmt::Display for $field {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )*
    };
}

impl_display!(Name, Phone, Email, Address, Tag, Remark);
