//! Lead capture form and its field-scoped validation.
//!
//! A [`LeadForm`] holds raw input plus one error slot per field. Editing a
//! field clears that field's error only; [`LeadForm::validate`] re-checks every
//! field and is the gate in front of submission.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    // local@domain.tld, no whitespace
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

// ============================================================================
// Experience bands
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExperienceBand {
    #[serde(rename = "0-1")]
    UpToOne,
    #[serde(rename = "2-5")]
    TwoToFive,
    #[serde(rename = "6-10")]
    SixToTen,
    #[serde(rename = "11-15")]
    ElevenToFifteen,
    #[serde(rename = "16+")]
    SixteenPlus,
}

impl ExperienceBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceBand::UpToOne => "0-1",
            ExperienceBand::TwoToFive => "2-5",
            ExperienceBand::SixToTen => "6-10",
            ExperienceBand::ElevenToFifteen => "11-15",
            ExperienceBand::SixteenPlus => "16+",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceBand::UpToOne => "0-1 years",
            ExperienceBand::TwoToFive => "2-5 years",
            ExperienceBand::SixToTen => "6-10 years",
            ExperienceBand::ElevenToFifteen => "11-15 years",
            ExperienceBand::SixteenPlus => "16+ years",
        }
    }

    pub fn variants() -> &'static [ExperienceBand] {
        &[
            ExperienceBand::UpToOne,
            ExperienceBand::TwoToFive,
            ExperienceBand::SixToTen,
            ExperienceBand::ElevenToFifteen,
            ExperienceBand::SixteenPlus,
        ]
    }
}

impl FromStr for ExperienceBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExperienceBand::variants()
            .iter()
            .copied()
            .find(|band| band.as_str() == s.trim())
            .ok_or_else(|| format!("unknown experience band: {}", s))
    }
}

impl fmt::Display for ExperienceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Lead
// ============================================================================

/// Body of `POST /api/jobs/{id}/apply-lead`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub current_position: String,
    pub experience_years: ExperienceBand,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ============================================================================
// Validation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LeadField {
    Name,
    Email,
    Phone,
    CurrentPosition,
    ExperienceYears,
    Message,
}

impl LeadField {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadField::Name => "name",
            LeadField::Email => "email",
            LeadField::Phone => "phone",
            LeadField::CurrentPosition => "current_position",
            LeadField::ExperienceYears => "experience_years",
            LeadField::Message => "message",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeadField::Name => "Full name",
            LeadField::Email => "Email",
            LeadField::Phone => "Phone",
            LeadField::CurrentPosition => "Current position",
            LeadField::ExperienceYears => "Experience",
            LeadField::Message => "Message",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, LeadField::Phone | LeadField::Message)
    }

    pub fn all() -> &'static [LeadField] {
        &[
            LeadField::Name,
            LeadField::Email,
            LeadField::Phone,
            LeadField::CurrentPosition,
            LeadField::ExperienceYears,
            LeadField::Message,
        ]
    }
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<LeadField, String>);

impl FieldErrors {
    pub fn get(&self, field: LeadField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn fields(&self) -> Vec<LeadField> {
        self.0.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LeadField, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn set(&mut self, field: LeadField, message: Option<String>) {
        match message {
            Some(message) => {
                self.0.insert(field, message);
            }
            None => {
                self.0.remove(&field);
            }
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field.as_str(), message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Check a single raw value. `None` means valid.
pub fn validate_field(field: LeadField, value: &str) -> Option<String> {
    let value = value.trim();
    match field {
        LeadField::Name if value.is_empty() => Some("Name is required".into()),
        LeadField::Email if value.is_empty() => Some("Email is required".into()),
        LeadField::Email if !EMAIL_REGEX.is_match(value) => {
            Some("Enter a valid email address".into())
        }
        LeadField::CurrentPosition if value.is_empty() => {
            Some("Current position is required".into())
        }
        LeadField::ExperienceYears if value.is_empty() => {
            Some("Select your years of experience".into())
        }
        LeadField::ExperienceYears if value.parse::<ExperienceBand>().is_err() => {
            Some("Select one of the listed experience ranges".into())
        }
        _ => None,
    }
}

/// Raw lead form input with field-scoped errors.
#[derive(Debug, Clone, Default)]
pub struct LeadForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub current_position: String,
    pub experience_years: String,
    pub message: String,
    errors: FieldErrors,
}

impl LeadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: LeadField) -> &str {
        match field {
            LeadField::Name => &self.name,
            LeadField::Email => &self.email,
            LeadField::Phone => &self.phone,
            LeadField::CurrentPosition => &self.current_position,
            LeadField::ExperienceYears => &self.experience_years,
            LeadField::Message => &self.message,
        }
    }

    /// Edit one field. Clears that field's error and leaves the others as
    /// they were.
    pub fn set(&mut self, field: LeadField, value: impl Into<String>) {
        let value = value.into();
        match field {
            LeadField::Name => self.name = value,
            LeadField::Email => self.email = value,
            LeadField::Phone => self.phone = value,
            LeadField::CurrentPosition => self.current_position = value,
            LeadField::ExperienceYears => self.experience_years = value,
            LeadField::Message => self.message = value,
        }
        self.errors.set(field, None);
    }

    /// Builder-style [`LeadForm::set`].
    pub fn with(mut self, field: LeadField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: LeadField) -> Option<&str> {
        self.errors.get(field)
    }

    /// Re-check every field, replacing the error set. Returns whether the form
    /// can be submitted.
    pub fn validate(&mut self) -> bool {
        let mut errors = FieldErrors::default();
        for field in LeadField::all() {
            errors.set(*field, validate_field(*field, self.value(*field)));
        }
        self.errors = errors;
        self.errors.is_empty()
    }

    /// Validate and build the wire payload.
    pub fn to_lead(&mut self) -> Result<Lead, FieldErrors> {
        if !self.validate() {
            return Err(self.errors.clone());
        }
        let experience_years = self
            .experience_years
            .parse()
            .map_err(|_| self.errors.clone())?;

        Ok(Lead {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: optional(&self.phone),
            current_position: self.current_position.trim().to_string(),
            experience_years,
            message: optional(&self.message),
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
