//! Form field values

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::controller::FormError;

/// One of the four contact form inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Organization,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Organization, Field::Message];

    /// Input name as used in the markup and the JSON body
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Organization => "organization",
            Field::Message => "message",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, Field::Organization)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

/// Current input values, sent as-is as the request body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    pub organization: String,
    pub message: String,
}

impl FormFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Organization => &self.organization,
            Field::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Organization => &mut self.organization,
            Field::Message => &mut self.message,
        };
        *slot = value.into();
    }

    /// First required input left empty, in form order
    pub fn first_missing(&self) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|field| field.is_required() && self.get(*field).is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        Field::ALL.into_iter().all(|field| self.get(field).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(field.as_str().parse::<Field>().unwrap(), field);
        }
        assert!(matches!(
            "phone".parse::<Field>(),
            Err(FormError::UnknownField(name)) if name == "phone"
        ));
    }

    #[test]
    fn test_only_organization_is_optional() {
        let required: Vec<_> = Field::ALL.into_iter().filter(Field::is_required).collect();
        assert_eq!(required, vec![Field::Name, Field::Email, Field::Message]);
    }

    #[test]
    fn test_first_missing_follows_form_order() {
        let mut fields = FormFields::default();
        assert_eq!(fields.first_missing(), Some(Field::Name));

        fields.set(Field::Name, "Jane");
        fields.set(Field::Message, "Hi");
        assert_eq!(fields.first_missing(), Some(Field::Email));

        fields.set(Field::Email, "jane@example.com");
        assert_eq!(fields.first_missing(), None);
    }

    #[test]
    fn test_whitespace_counts_as_present() {
        // Matches HTML `required`; trimming is the server's job.
        let mut fields = FormFields::default();
        fields.set(Field::Name, " ");
        fields.set(Field::Email, " ");
        fields.set(Field::Message, " ");
        assert_eq!(fields.first_missing(), None);
    }

    #[test]
    fn test_serializes_as_request_body() {
        let mut fields = FormFields::default();
        fields.set(Field::Name, "Jane Doe");
        fields.set(Field::Email, "jane@example.com");
        fields.set(Field::Message, "Hello");

        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "organization": "",
                "message": "Hello"
            })
        );
    }

    #[test]
    fn test_clear() {
        let mut fields = FormFields::default();
        fields.set(Field::Organization, "Club");
        assert!(!fields.is_empty());
        fields.clear();
        assert!(fields.is_empty());
    }
}
