//! Draft/published record and its derived status.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Publication status derived from which snapshots are present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// Neither draft nor published
    None,
    /// Unpublished edits only
    Draft,
    /// Live, no pending edits
    Published,
    /// Live with pending edits
    Both,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::None => "NONE",
            Status::Draft => "DRAFT",
            Status::Published => "PUBLISHED",
            Status::Both => "BOTH",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Draft and published snapshots of one entity.
///
/// An entity that has never been drafted or published has no stored record;
/// it reads as the empty default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<Value>,
}

impl StateRecord {
    pub fn status(&self) -> Status {
        match (self.draft.is_some(), self.published.is_some()) {
            (false, false) => Status::None,
            (true, false) => Status::Draft,
            (false, true) => Status::Published,
            (true, true) => Status::Both,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status() == Status::None
    }

    /// Draft if present, else published
    pub fn preferred(&self) -> Option<&Value> {
        self.draft.as_ref().or(self.published.as_ref())
    }
}
