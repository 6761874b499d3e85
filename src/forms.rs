//! Field validation and per-form state for the sign-in and sign-up forms.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::config::Config;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Password,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Full Name",
            Field::Email => "Email Address",
            Field::Password => "Password",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    pub password_min_len: usize,
    pub name_min_len: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self { password_min_len: 8, name_min_len: 2 }
    }
}

impl From<&Config> for ValidationRules {
    fn from(config: &Config) -> Self {
        Self {
            password_min_len: config.password_min_len,
            name_min_len: config.name_min_len,
        }
    }
}

/// Returns the error to show for `value`, or `None` when it is acceptable.
pub fn validate_field(field: Field, value: &str, rules: &ValidationRules) -> Option<String> {
    match field {
        Field::Email => {
            if value.is_empty() {
                Some("Email is required".into())
            } else if !EMAIL_RE.is_match(value) {
                Some("Please enter a valid email".into())
            } else {
                None
            }
        }
        Field::Password => {
            if value.is_empty() {
                Some("Password is required".into())
            } else if value.chars().count() < rules.password_min_len {
                Some(format!("Password must be at least {} characters", rules.password_min_len))
            } else {
                None
            }
        }
        Field::Name => {
            let name = value.trim();
            if name.is_empty() {
                Some("Name is required".into())
            } else if name.chars().count() < rules.name_min_len {
                Some(format!("Name must be at least {} characters", rules.name_min_len))
            } else {
                None
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    rules: ValidationRules,
    values: BTreeMap<Field, String>,
    errors: BTreeMap<Field, String>,
    touched: BTreeMap<Field, bool>,
}

impl FormState {
    pub fn new(fields: &[Field], rules: ValidationRules) -> Self {
        Self {
            rules,
            values: fields.iter().map(|f| (*f, String::new())).collect(),
            errors: BTreeMap::new(),
            touched: BTreeMap::new(),
        }
    }

    pub fn sign_in(rules: ValidationRules) -> Self {
        Self::new(&[Field::Email, Field::Password], rules)
    }

    pub fn sign_up(rules: ValidationRules) -> Self {
        Self::new(&[Field::Name, Field::Email, Field::Password], rules)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.values.keys().copied()
    }

    pub fn value(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.get(&field).copied().unwrap_or(false)
    }

    fn revalidate(&mut self, field: Field) {
        match validate_field(field, self.value(field), &self.rules) {
            Some(err) => self.errors.insert(field, err),
            None => self.errors.remove(&field),
        };
    }

    /// Records a keystroke. Errors only refresh once the field has been
    /// touched so the user is not nagged mid-typing.
    pub fn change(&mut self, field: Field, value: &str) {
        if let Some(slot) = self.values.get_mut(&field) {
            *slot = value.to_string();
            if self.is_touched(field) {
                self.revalidate(field);
            }
        }
    }

    pub fn blur(&mut self, field: Field) {
        if self.values.contains_key(&field) {
            self.touched.insert(field, true);
            self.revalidate(field);
        }
    }

    /// Validates and touches every field. Returns `true` when the form may be
    /// submitted.
    pub fn validate_all(&mut self) -> bool {
        let fields: Vec<Field> = self.fields().collect();
        for field in fields {
            self.touched.insert(field, true);
            self.revalidate(field);
        }
        self.errors.is_empty()
    }

    /// Whether the submit button should be enabled.
    pub fn is_submittable(&self) -> bool {
        self.errors.is_empty() && self.values.values().all(|v| !v.trim().is_empty())
    }

    pub fn reset(&mut self) {
        for value in self.values.values_mut() {
            value.clear();
        }
        self.errors.clear();
        self.touched.clear();
    }
}
