use std::{collections::HashMap, fmt};

/// Literal marker that starts a named argument, e.g. `n/` or `-c`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Prefix(&'static str);

impl Prefix {
    pub const fn new(prefix: &'static str) -> Self {
        Prefix(prefix)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Result of tokenizing one line: the preamble plus every value seen per prefix, in input order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArgumentMap {
    preamble: String,
    values: HashMap<Prefix, Vec<String>>,
}

impl ArgumentMap {
    /// Text before the first recognised prefix, trimmed
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Last value given for `prefix`. Present but empty is `Some("")`, never `None`.
    pub fn value(&self, prefix: Prefix) -> Option<&str> {
        self.values
            .get(&prefix)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Every value given for `prefix`, in input order
    pub fn all_values(&self, prefix: Prefix) -> &[String] {
        self.values
            .get(&prefix)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_present(&self, prefix: Prefix) -> bool {
        self.values.contains_key(&prefix)
    }

    /// Prefixes among `prefixes` that were given more than once, in the order they were asked for
    pub fn duplicated_prefixes(&self, prefixes: &[Prefix]) -> Vec<Prefix> {
        prefixes
            .iter()
            .copied()
            .filter(|prefix| self.all_values(*prefix).len() > 1)
            .collect()
    }
}

#[derive(Debug)]
struct PrefixPosition {
    start: usize,
    prefix: Prefix,
}

/// Splits `raw` into a preamble and prefixed values.
///
/// A declared prefix only counts when it sits at the start of the line or right after
/// whitespace, so `e/alice@x.com` does not see a prefix inside the address `a/Blk 1/2`.
/// Prefixes that were not declared are plain text.
pub fn tokenize(raw: &str, declared_prefixes: &[Prefix]) -> ArgumentMap {
    let positions = find_prefix_positions(raw, declared_prefixes);

    let preamble_end = positions.first().map_or(raw.len(), |position| position.start);

    let mut values: HashMap<Prefix, Vec<String>> = HashMap::new();

    for (i, position) in positions.iter().enumerate() {
        let value_start = position.start + position.prefix.as_str().len();
        let value_end = positions
            .get(i + 1)
            .map_or(raw.len(), |next| next.start);

        values
            .entry(position.prefix)
            .or_default()
            .push(raw[value_start..value_end].trim().to_string());
    }

    ArgumentMap {
        preamble: raw[..preamble_end].trim().to_string(),
        values,
    }
}

fn find_prefix_positions(raw: &str, declared_prefixes: &[Prefix]) -> Vec<PrefixPosition> {
    let mut positions: Vec<PrefixPosition> = declared_prefixes
        .iter()
        .flat_map(|prefix| {
            raw.match_indices(prefix.as_str())
                .filter(|(start, _)| is_delimited(raw, *start))
                .map(|(start, _)| PrefixPosition {
                    start,
                    prefix: *prefix,
                })
        })
        .collect();

    // Longest prefix wins when two declared prefixes start at the same position
    positions.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(b.prefix.as_str().len().cmp(&a.prefix.as_str().len()))
    });
    positions.dedup_by_key(|position| position.start);

    // A match that begins inside the previous prefix token is text, not a delimiter
    let mut accepted: Vec<PrefixPosition> = Vec::with_capacity(positions.len());

    for position in positions {
        if let Some(previous) = accepted.last() {
            if position.start < previous.start + previous.prefix.as_str().len() {
                continue;
            }
        }

        accepted.push(position);
    }

    accepted
}

fn is_delimited(raw: &str, start: usize) -> bool {
    raw[..start]
        .chars()
        .next_back()
        .map_or(true, char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: Prefix = Prefix::new("n/");
    const PHONE: Prefix = Prefix::new("p/");
    const EMAIL: Prefix = Prefix::new("e/");
    const ADDRESS: Prefix = Prefix::new("a/");
    const TAG: Prefix = Prefix::new("t/");
    const CATEGORY: Prefix = Prefix::new("-c");

    const FIELDS: [Prefix; 4] = [NAME, PHONE, EMAIL, ADDRESS];

    #[test]
    fn name_and_phone() {
        let map = tokenize("n/John Doe p/98765432", &FIELDS);

        assert_eq!(map.preamble(), "");
        assert_eq!(map.value(NAME), Some("John Doe"));
        assert_eq!(map.value(PHONE), Some("98765432"));
        assert_eq!(map.value(EMAIL), None);
    }

    #[test]
    fn empty_input() {
        let map = tokenize("", &FIELDS);

        assert_eq!(map.preamble(), "");
        assert_eq!(map, ArgumentMap::default());
    }

    #[test]
    fn whitespace_only_input() {
        let map = tokenize("   \t ", &FIELDS);

        assert_eq!(map.preamble(), "");
        assert!(!map.is_present(NAME));
    }

    #[test]
    fn preamble_is_trimmed() {
        let map = tokenize("  12  n/Bob ", &FIELDS);

        assert_eq!(map.preamble(), "12");
        assert_eq!(map.value(NAME), Some("Bob"));
    }

    #[test]
    fn no_prefixes_is_all_preamble() {
        let map = tokenize(" some random text ", &FIELDS);

        assert_eq!(map.preamble(), "some random text");
    }

    #[test]
    fn present_but_empty_is_not_absent() {
        let map = tokenize("n/Bob p/ e/", &FIELDS);

        assert_eq!(map.value(PHONE), Some(""));
        assert_eq!(map.value(EMAIL), Some(""));
        assert!(map.is_present(PHONE));
        assert!(!map.is_present(ADDRESS));
    }

    #[test]
    fn repeated_prefix_keeps_every_value_and_last_wins() {
        let map = tokenize("n/Bob t/friends t/colleagues n/Robert", &[NAME, TAG]);

        assert_eq!(map.value(NAME), Some("Robert"));
        assert_eq!(map.all_values(NAME), ["Bob", "Robert"]);
        assert_eq!(map.all_values(TAG), ["friends", "colleagues"]);
        assert_eq!(map.duplicated_prefixes(&[NAME, TAG, PHONE]), vec![NAME, TAG]);
    }

    #[test]
    fn absent_prefix_has_no_values() {
        let map = tokenize("n/Bob", &FIELDS);

        assert!(map.all_values(TAG).is_empty());
        assert!(map.duplicated_prefixes(&FIELDS).is_empty());
    }

    #[test]
    fn prefix_inside_a_value_is_not_a_delimiter() {
        // `e/` inside the address and `n/` inside the email are not preceded by whitespace
        let map = tokenize("n/Bob a/Blk 1/e/2 e/bob@mail.com/n/x", &FIELDS);

        assert_eq!(map.value(ADDRESS), Some("Blk 1/e/2"));
        assert_eq!(map.value(EMAIL), Some("bob@mail.com/n/x"));
        assert_eq!(map.all_values(NAME), ["Bob"]);
    }

    #[test]
    fn undeclared_prefix_is_plain_text() {
        let map = tokenize("n/Bob t/friends", &FIELDS);

        assert_eq!(map.value(NAME), Some("Bob t/friends"));
        assert!(!map.is_present(TAG));
    }

    #[test]
    fn dash_prefixes() {
        let map = tokenize("n/Bob -c Client", &[NAME, CATEGORY]);

        assert_eq!(map.value(NAME), Some("Bob"));
        assert_eq!(map.value(CATEGORY), Some("Client"));
    }

    #[test]
    fn any_whitespace_delimits() {
        let map = tokenize("n/Bob\tp/123\ne/b@c.com", &FIELDS);

        assert_eq!(map.value(NAME), Some("Bob"));
        assert_eq!(map.value(PHONE), Some("123"));
        assert_eq!(map.value(EMAIL), Some("b@c.com"));
    }

    #[test]
    fn longest_declared_prefix_wins_at_same_position() {
        const SHORT: Prefix = Prefix::new("-c");
        const LONG: Prefix = Prefix::new("-ca");

        let map = tokenize("-ca x -c y", &[SHORT, LONG]);

        assert_eq!(map.value(LONG), Some("x"));
        assert_eq!(map.value(SHORT), Some("y"));
    }

    #[test]
    fn non_ascii_text_is_handled() {
        let map = tokenize("n/Zoë p/123 a/Straße 5", &FIELDS);

        assert_eq!(map.value(NAME), Some("Zoë"));
        assert_eq!(map.value(ADDRESS), Some("Straße 5"));
    }

    #[test]
    fn rejoining_tokens_keeps_the_content() {
        let line = "1 n/John Doe p/98765432 a/Block 1, Street 2 n/Jo";
        let map = tokenize(line, &FIELDS);

        let rejoined = format!(
            "{} n/{} p/{} a/{} n/{}",
            map.preamble(),
            map.all_values(NAME)[0],
            map.value(PHONE).unwrap(),
            map.value(ADDRESS).unwrap(),
            map.all_values(NAME)[1],
        );

        assert_eq!(tokenize(&rejoined, &FIELDS), map);
    }
}
