//! Predicate vocabulary for claims

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a predicate's object is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateCategory {
    /// Scalar value stored in the claim's object literal
    Literal,
    /// Reference to another person stored in the claim's object reference
    Relational,
}

/// Fixed vocabulary of claim predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Full name
    HasName,
    /// Given (first) name
    HasGivenName,
    /// Family name
    HasSurname,
    /// Gender
    HasGender,
    /// Birth date
    BornOn,
    /// Birth place
    BornAt,
    /// Death date
    DiedOn,
    /// Death place
    DiedAt,
    /// Marriage date
    MarriedOn,
    /// Marriage place
    MarriedAt,
    /// Burial place
    BuriedAt,
    /// Subject is a parent of the object person
    ParentOf,
    /// Subject is a child of the object person
    ChildOf,
    /// Subject is a spouse of the object person
    SpouseOf,
    /// Subject is a sibling of the object person
    SiblingOf,
    /// Residence
    ResidedAt,
    /// Migration origin
    MigratedFrom,
    /// Migration destination
    MigratedTo,
    /// Occupation
    Occupation,
    /// Unspecified relation to the object person
    RelatedTo,
    /// Identity equivalence with the object person
    SameAs,
}

impl Predicate {
    /// Every predicate, in declaration order
    pub const ALL: [Predicate; 21] = [
        Predicate::HasName,
        Predicate::HasGivenName,
        Predicate::HasSurname,
        Predicate::HasGender,
        Predicate::BornOn,
        Predicate::BornAt,
        Predicate::DiedOn,
        Predicate::DiedAt,
        Predicate::MarriedOn,
        Predicate::MarriedAt,
        Predicate::BuriedAt,
        Predicate::ParentOf,
        Predicate::ChildOf,
        Predicate::SpouseOf,
        Predicate::SiblingOf,
        Predicate::ResidedAt,
        Predicate::MigratedFrom,
        Predicate::MigratedTo,
        Predicate::Occupation,
        Predicate::RelatedTo,
        Predicate::SameAs,
    ];

    /// Kinship predicates used for relationship similarity
    pub const KINSHIP: [Predicate; 4] = [
        Predicate::ParentOf,
        Predicate::ChildOf,
        Predicate::SpouseOf,
        Predicate::SiblingOf,
    ];

    /// Get the wire name of the predicate
    pub fn as_str(&self) -> &'static str {
        match self {
            Predicate::HasName => "has_name",
            Predicate::HasGivenName => "has_given_name",
            Predicate::HasSurname => "has_surname",
            Predicate::HasGender => "has_gender",
            Predicate::BornOn => "born_on",
            Predicate::BornAt => "born_at",
            Predicate::DiedOn => "died_on",
            Predicate::DiedAt => "died_at",
            Predicate::MarriedOn => "married_on",
            Predicate::MarriedAt => "married_at",
            Predicate::BuriedAt => "buried_at",
            Predicate::ParentOf => "parent_of",
            Predicate::ChildOf => "child_of",
            Predicate::SpouseOf => "spouse_of",
            Predicate::SiblingOf => "sibling_of",
            Predicate::ResidedAt => "resided_at",
            Predicate::MigratedFrom => "migrated_from",
            Predicate::MigratedTo => "migrated_to",
            Predicate::Occupation => "occupation",
            Predicate::RelatedTo => "related_to",
            Predicate::SameAs => "same_as",
        }
    }

    /// Parse a predicate from its wire name (case-insensitive, `-` accepted for `_`)
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|p| p.as_str() == normalized)
    }

    /// Whether the object is a literal or a person reference
    pub fn category(&self) -> PredicateCategory {
        match self {
            Predicate::ParentOf
            | Predicate::ChildOf
            | Predicate::SpouseOf
            | Predicate::SiblingOf
            | Predicate::RelatedTo
            | Predicate::SameAs => PredicateCategory::Relational,
            _ => PredicateCategory::Literal,
        }
    }

    /// Parent/child/spouse/sibling
    pub fn is_kinship(&self) -> bool {
        Self::KINSHIP.contains(self)
    }

    /// Literal predicates whose value is a calendar date
    pub fn is_date(&self) -> bool {
        matches!(self, Predicate::BornOn | Predicate::DiedOn | Predicate::MarriedOn)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Predicate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid predicate: {}", s))
    }
}
