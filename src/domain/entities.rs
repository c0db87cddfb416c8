//! Domain entities: the catalog payload and the values passed around it

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::node::{Node, NodeId};

/// Lifecycle status of a catalog record.
///
/// Stored and exchanged as the backend's numeric codes (2 active, 3 archived).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Status {
    #[default]
    Active,
    Archived,
}

impl Status {
    pub fn code(self) -> i64 {
        match self {
            Status::Active => 2,
            Status::Archived => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            2 => Some(Status::Active),
            3 => Some(Status::Archived),
            _ => None,
        }
    }

    /// Archived records come back active, everything else gets archived.
    pub fn toggled(self) -> Self {
        match self {
            Status::Archived => Status::Active,
            Status::Active => Status::Archived,
        }
    }
}

impl From<Status> for i64 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl TryFrom<i64> for Status {
    type Error = String;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Status::from_code(code).ok_or_else(|| format!("unknown status code {code}"))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Active => write!(f, "active"),
            Status::Archived => write!(f, "archived"),
        }
    }
}

/// Which statuses a listing includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    ActiveOnly,
    All,
}

impl StatusFilter {
    pub fn statuses(self) -> &'static [Status] {
        match self {
            StatusFilter::ActiveOnly => &[Status::Active],
            StatusFilter::All => &[Status::Active, Status::Archived],
        }
    }

    pub fn accepts(self, status: Status) -> bool {
        self.statuses().contains(&status)
    }
}

/// A product characteristic, the payload of the catalog tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristic {
    pub name: String,
    pub technical_name: String,
    /// Characteristic type id
    #[serde(default)]
    pub kind: i64,
    /// Whether subscriptions may set a numeric limit for it
    #[serde(default)]
    pub manages_limits: bool,
    #[serde(default)]
    pub status: Status,
}

impl Characteristic {
    pub fn new(name: impl Into<String>, technical_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            technical_name: technical_name.into(),
            kind: 0,
            manages_limits: false,
            status: Status::Active,
        }
    }

    pub fn with_limits(mut self, manages_limits: bool) -> Self {
        self.manages_limits = manages_limits;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_kind(mut self, kind: i64) -> Self {
        self.kind = kind;
        self
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.technical_name)?;
        if self.status == Status::Archived {
            write!(f, " [archived]")?;
        }
        Ok(())
    }
}

pub type CharacteristicNode = Node<Characteristic>;

/// The user on whose behalf collaborators are called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Actor {
    pub user_id: i64,
}

impl Actor {
    pub fn new(user_id: i64) -> Self {
        Self { user_id }
    }
}

/// One selected characteristic of a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionDetail {
    pub characteristic_id: NodeId,
    pub limit: Option<i64>,
}
