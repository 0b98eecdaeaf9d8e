use crate::parser::tokenizer::Prefix;

// Messages shared by more than one command
pub const MESSAGE_UNKNOWN_COMMAND: &str = "Unknown command";
pub const MESSAGE_INVALID_PERSON_DISPLAYED_INDEX: &str = "The contact index provided is invalid";
pub const MESSAGE_DUPLICATE_FIELDS: &str =
    "Multiple values specified for the following single-valued field(s): ";
pub const MESSAGE_NO_MATCH: &str = "No matching person found";

pub fn invalid_command_format(usage: &str) -> String {
    format!("Invalid command format! \n{}", usage)
}

pub fn persons_listed_overview(count: usize) -> String {
    format!("{} persons listed!", count)
}

// Field prefixes for add / edit
pub const PREFIX_NAME: Prefix = Prefix::new("n/");
pub const PREFIX_PHONE: Prefix = Prefix::new("p/");
pub const PREFIX_EMAIL: Prefix = Prefix::new("e/");
pub const PREFIX_ADDRESS: Prefix = Prefix::new("a/");
pub const PREFIX_TAG: Prefix = Prefix::new("t/");
pub const PREFIX_CATEGORY: Prefix = Prefix::new("-c");
pub const PREFIX_REMARK: Prefix = Prefix::new("r/");

// Field prefixes for delete-by
pub const PREFIX_DELETE_NAME: Prefix = Prefix::new("-n");
pub const PREFIX_DELETE_PHONE: Prefix = Prefix::new("-p");
pub const PREFIX_DELETE_EMAIL: Prefix = Prefix::new("-e");
pub const PREFIX_DELETE_ADDRESS: Prefix = Prefix::new("-a");
pub const PREFIX_DELETE_TAG: Prefix = Prefix::new("-t");

// Values
pub const DEFAULT_DATA_DIRECTORY: &str = "data";

/// Position of a person in the filtered view.
///
/// Users type one-based positions, everything internal is zero-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Index(usize);

impl Index {
    pub fn from_zero_based(index: usize) -> Self {
        Index(index)
    }

    pub fn zero_based(self) -> usize {
        self.0
    }

    pub fn one_based(self) -> usize {
        self.0 + 1
    }
}

#[derive(Debug, PartialEq)]
pub enum IndexError {
    NotANumber(String),
    NegativeOrZero(String),
}

impl TryFrom<&str> for Index {
    type Error = IndexError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();

        // Signs are rejected here as well, `+1` is not a valid position
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
            let negative = value
                .strip_prefix('-')
                .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()));

            if negative {
                return Err(IndexError::NegativeOrZero(value.to_string()));
            }

            return Err(IndexError::NotANumber(value.to_string()));
        }

        let one_based: usize = value
            .parse()
            .map_err(|_| IndexError::NotANumber(value.to_string()))?;

        if one_based == 0 {
            return Err(IndexError::NegativeOrZero(value.to_string()));
        }

        Ok(Index(one_based - 1))
    }
}

impl std::fmt::Display for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.one_based())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_based_input_becomes_zero_based() {
        let index = Index::try_from("1").expect("should parse");

        assert_eq!(index.zero_based(), 0);
        assert_eq!(index.one_based(), 1);
        assert_eq!(index.to_string(), "1");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(Index::try_from("  3 "), Ok(Index::from_zero_based(2)));
    }

    #[test]
    fn zero_and_negative_are_rejected() {
        assert_eq!(
            Index::try_from("0"),
            Err(IndexError::NegativeOrZero("0".to_string()))
        );
        assert_eq!(
            Index::try_from("-4"),
            Err(IndexError::NegativeOrZero("-4".to_string()))
        );
    }

    #[test]
    fn non_numeric_is_rejected() {
        assert_eq!(
            Index::try_from("a"),
            Err(IndexError::NotANumber("a".to_string()))
        );
        assert_eq!(
            Index::try_from("+1"),
            Err(IndexError::NotANumber("+1".to_string()))
        );
        assert_eq!(
            Index::try_from("1 abc"),
            Err(IndexError::NotANumber("1 abc".to_string()))
        );
        assert_eq!(Index::try_from(""), Err(IndexError::NotANumber("".to_string())));
    }

    #[test]
    fn overflowing_number_is_rejected() {
        assert!(matches!(
            Index::try_from("99999999999999999999999999"),
            Err(IndexError::NotANumber(_))
        ));
    }
}
