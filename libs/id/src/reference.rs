//! References that address a resource by ID or by slug.

use std::fmt;
use std::str::FromStr;

use crate::IdError;

/// A user-supplied reference to a resource: either its numeric ID or its slug.
///
/// Parsing always tries the numeric form first. Only input that does not
/// parse as an ID is treated as a slug, so `"123"` can never name a slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceRef<Id> {
    /// Provider-assigned numeric ID.
    Id(Id),

    /// Human-readable slug (e.g. `ubuntu-24-04-x64`).
    Slug(String),
}

impl<Id: FromStr> ResourceRef<Id> {
    /// Parse a reference, preferring the ID form.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }

        if let Ok(id) = s.parse::<Id>() {
            return Ok(Self::Id(id));
        }

        if s.chars().any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '%')) {
            return Err(IdError::InvalidSlug(s.to_string()));
        }

        Ok(Self::Slug(s.to_string()))
    }
}

impl<Id> ResourceRef<Id> {
    /// Returns the ID if this reference is numeric.
    pub fn as_id(&self) -> Option<&Id> {
        match self {
            Self::Id(id) => Some(id),
            Self::Slug(_) => None,
        }
    }

    /// Returns the slug if this reference is not numeric.
    pub fn as_slug(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Slug(slug) => Some(slug),
        }
    }
}

impl<Id: FromStr> FromStr for ResourceRef<Id> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<Id: fmt::Display> fmt::Display for ResourceRef<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Slug(slug) => f.write_str(slug),
        }
    }
}

impl<Id: serde::Serialize> serde::Serialize for ResourceRef<Id> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Id(id) => id.serialize(serializer),
            Self::Slug(slug) => serializer.serialize_str(slug),
        }
    }
}

impl<Id> From<Id> for ResourceRef<Id> {
    fn from(id: Id) -> Self {
        Self::Id(id)
    }
}
