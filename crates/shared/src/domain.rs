use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(PersonId);
id_newtype!(GroupId);
id_newtype!(ModelId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub person_id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
}

impl Person {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub group_id: GroupId,
    pub name: String,
}

/// A model as the Commons reports it in search results and upload responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model_id: ModelId,
    pub name: String,
    pub url: String,
    pub updated_at: DateTime<Utc>,
}

/// How the current model relates to what already exists on the Commons.
/// Exactly one mode is active at a time; the dialog starts in `New`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadMode {
    New,
    NewVersion,
    Child,
}

/// Who may see or change an uploaded model. Serializes to the Commons'
/// single-letter permission ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionLevel {
    #[serde(rename = "a")]
    Everyone,
    #[serde(rename = "g")]
    Group,
    #[serde(rename = "u")]
    UserOnly,
}

impl PermissionLevel {
    /// Selector display order.
    pub const ALL: [PermissionLevel; 3] = [
        PermissionLevel::Everyone,
        PermissionLevel::Group,
        PermissionLevel::UserOnly,
    ];

    pub fn wire_id(self) -> &'static str {
        match self {
            PermissionLevel::Everyone => "a",
            PermissionLevel::Group => "g",
            PermissionLevel::UserOnly => "u",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PermissionLevel::Everyone => "everyone",
            PermissionLevel::Group => "group members",
            PermissionLevel::UserOnly => "you only",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Observer,
    Turtle,
    Patch,
    Link,
}

impl AgentKind {
    /// Single-character code used when reporting compiled commands to
    /// external listeners.
    pub fn code(self) -> char {
        match self {
            AgentKind::Turtle => 'T',
            AgentKind::Patch => 'P',
            AgentKind::Link => 'L',
            AgentKind::Observer => 'O',
        }
    }
}

/// Compiler diagnostic attached to compiled-event notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileError {
    pub message: String,
    pub start: usize,
    pub end: usize,
}
