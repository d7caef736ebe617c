//! Payload validation - declarative per-field rules over JSON payloads.
//!
//! Every field is checked, and the first rule a field fails contributes one
//! message for that field. An empty [`ValidationErrors`] means the payload
//! passed.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::domain::NewPost;

/// Maximum title length, matching the `posts.title` column.
pub const TITLE_MAX_CHARS: usize = 255;

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN_CHARS: usize = 8;

/// A single validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Present, not null, and not blank when a string.
    Required,
    /// A JSON string.
    String,
    /// Looks like `local@domain`.
    Email,
    /// At least this many characters.
    Min(usize),
    /// At most this many characters.
    Max(usize),
}

/// Rules attached to one payload field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

/// Rules for creating or updating a post.
pub const POST_RULES: &[FieldRules] = &[FieldRules {
    field: "title",
    rules: &[Rule::Required, Rule::String, Rule::Max(TITLE_MAX_CHARS)],
}];

/// Rules for registering an account.
pub const REGISTER_RULES: &[FieldRules] = &[
    FieldRules {
        field: "email",
        rules: &[Rule::Required, Rule::String, Rule::Email, Rule::Max(255)],
    },
    FieldRules {
        field: "password",
        rules: &[Rule::Required, Rule::String, Rule::Min(PASSWORD_MIN_CHARS)],
    },
];

/// Rules for logging in.
pub const LOGIN_RULES: &[FieldRules] = &[
    FieldRules {
        field: "email",
        rules: &[Rule::Required, Rule::String],
    },
    FieldRules {
        field: "password",
        rules: &[Rule::Required, Rule::String],
    },
];

/// Field-level validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether the given field failed at least one rule.
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.fields
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for messages in self.fields.values() {
            for message in messages {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Check `payload` against `rules`.
///
/// A payload that is not a JSON object is treated as having no fields.
pub fn validate(payload: &Value, rules: &[FieldRules]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    for field_rules in rules {
        let value = payload.get(field_rules.field);
        if let Some(message) = first_failure(field_rules.field, value, field_rules.rules) {
            errors.add(field_rules.field, message);
        }
    }

    errors.into_result()
}

/// Validate a create/update payload and extract the new title.
pub fn validate_post(payload: &Value) -> Result<NewPost, ValidationErrors> {
    validate(payload, POST_RULES)?;

    match payload.get("title").and_then(Value::as_str) {
        Some(title) => Ok(NewPost::new(title.to_string())),
        // Unreachable once `Required` and `String` passed.
        None => {
            let mut errors = ValidationErrors::new();
            errors.add("title", "The title field is required.");
            Err(errors)
        }
    }
}

fn first_failure(field: &str, value: Option<&Value>, rules: &[Rule]) -> Option<String> {
    let present = match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    };

    if !present {
        return rules
            .contains(&Rule::Required)
            .then(|| format!("The {field} field is required."));
    }

    let value = value?;
    for rule in rules {
        let failed = match rule {
            Rule::Required => false,
            Rule::String => !value.is_string(),
            Rule::Email => value.as_str().is_some_and(|s| !looks_like_email(s)),
            Rule::Min(min) => value.as_str().is_some_and(|s| s.chars().count() < *min),
            Rule::Max(max) => value.as_str().is_some_and(|s| s.chars().count() > *max),
        };
        if failed {
            return Some(message_for(field, *rule));
        }
    }

    None
}

fn message_for(field: &str, rule: Rule) -> String {
    match rule {
        Rule::Required => format!("The {field} field is required."),
        Rule::String => format!("The {field} must be a string."),
        Rule::Email => format!("The {field} must be a valid email address."),
        Rule::Min(min) => format!("The {field} must be at least {min} characters."),
        Rule::Max(max) => format!("The {field} may not be greater than {max} characters."),
    }
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !s.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
