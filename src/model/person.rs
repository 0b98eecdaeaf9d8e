use std::{collections::BTreeSet, fmt};

use super::fields::{Address, Category, Email, Name, Phone, Remark, Tag};

/// A contact. Immutable once built, every "edit" produces a new `Person`.
///
/// Identity fields: name, phone, email. Data fields: address, tags, category, remark.
///
/// `PartialEq` is the strong notion of equality (every field), `is_same_person`
/// is the weak one (identity fields only).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Person {
    name: Name,
    phone: Option<Phone>,
    email: Option<Email>,
    address: Option<Address>,
    tags: BTreeSet<Tag>,
    category: Option<Category>,
    remark: Option<Remark>,
}

impl Person {
    pub fn new(name: Name) -> Self {
        Person {
            name,
            phone: None,
            email: None,
            address: None,
            tags: BTreeSet::new(),
            category: None,
            remark: None,
        }
    }

    pub fn with_name(mut self, name: Name) -> Self {
        self.name = name;
        self
    }

    pub fn with_phone(mut self, phone: Option<Phone>) -> Self {
        self.phone = phone;
        self
    }

    pub fn with_email(mut self, email: Option<Email>) -> Self {
        self.email = email;
        self
    }

    pub fn with_address(mut self, address: Option<Address>) -> Self {
        self.address = address;
        self
    }

    pub fn with_tags(mut self, tags: BTreeSet<Tag>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    pub fn with_remark(mut self, remark: Option<Remark>) -> Self {
        self.remark = remark;
        self
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn phone(&self) -> Option<&Phone> {
        self.phone.as_ref()
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn remark(&self) -> Option<&Remark> {
        self.remark.as_ref()
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.category == Some(category)
    }

    /// Weak identity: same name, phone and email. Used for duplicate detection.
    pub fn is_same_person(&self, other: &Person) -> bool {
        self.name == other.name && self.phone == other.phone && self.email == other.email
    }

    /// Tags rendered as `[a][b]`, sorted
    pub fn tags_display(&self) -> String {
        self.tags.iter().map(|tag| format!("[{}]", tag)).collect()
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;

        if let Some(phone) = &self.phone {
            write!(f, "; Phone: {}", phone)?;
        }

        if let Some(email) = &self.email {
            write!(f, "; Email: {}", email)?;
        }

        if let Some(address) = &self.address {
            write!(f, "; Address: {}", address)?;
        }

        if !self.tags.is_empty() {
            write!(f, "; Tags: {}", self.tags_display())?;
        }

        if let Some(category) = &self.category {
            write!(f, "; Category: {}", category)?;
        }

        if let Some(remark) = &self.remark {
            write!(f, "; Remark: {}", remark)?;
        }

        Ok(())
    }
}

#[cfg(test)]
impl Person {
    /// Alice Tan with every field set
    pub fn new_test() -> Self {
        Person::new(Name::new("Alice Tan").unwrap())
            .with_phone(Some(Phone::new("11111111").unwrap()))
            .with_email(Some(Email::new("alice@example.com").unwrap()))
            .with_address(Some(Address::new("Block 1").unwrap()))
            .with_tags(BTreeSet::from([Tag::new("friends").unwrap()]))
            .with_category(Some(Category::Client))
    }

    pub fn new_test_named(name: &str, phone: &str) -> Self {
        Person::new(Name::new(name).unwrap()).with_phone(Some(Phone::new(phone).unwrap()))
    }
}
