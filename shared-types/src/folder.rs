use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Error returned when a stored or user-supplied string does not name a known value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFolderValueError {
    #[error("Unknown folder type: {0}")]
    FolderType(String),

    #[error("Unknown folder class: {0}")]
    FolderClass(String),

    #[error("Unknown more-messages state: {0}")]
    MoreMessages(String),
}

/// Role of a folder on the mail server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderType {
    Regular,
    Inbox,
    Outbox,
    Drafts,
    Sent,
    Trash,
    Spam,
    Archive,
}

impl FolderType {
    /// Value stored in the `folders.type` column
    pub fn to_database_folder_type(self) -> &'static str {
        match self {
            FolderType::Regular => "regular",
            FolderType::Inbox => "inbox",
            FolderType::Outbox => "outbox",
            FolderType::Drafts => "drafts",
            FolderType::Sent => "sent",
            FolderType::Trash => "trash",
            FolderType::Spam => "spam",
            FolderType::Archive => "archive",
        }
    }
}

impl FromStr for FolderType {
    type Err = ParseFolderValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(FolderType::Regular),
            "inbox" => Ok(FolderType::Inbox),
            "outbox" => Ok(FolderType::Outbox),
            "drafts" => Ok(FolderType::Drafts),
            "sent" => Ok(FolderType::Sent),
            "trash" => Ok(FolderType::Trash),
            "spam" => Ok(FolderType::Spam),
            "archive" => Ok(FolderType::Archive),
            other => Err(ParseFolderValueError::FolderType(other.to_string())),
        }
    }
}

impl std::fmt::Display for FolderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_database_folder_type())
    }
}

/// Display/sync class a user assigns to a folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FolderClass {
    NoClass,
    Inherited,
    FirstClass,
    SecondClass,
}

impl FolderClass {
    /// Symbolic name persisted in `folders.display_class`
    pub fn name(self) -> &'static str {
        match self {
            FolderClass::NoClass => "NO_CLASS",
            FolderClass::Inherited => "INHERITED",
            FolderClass::FirstClass => "FIRST_CLASS",
            FolderClass::SecondClass => "SECOND_CLASS",
        }
    }
}

impl FromStr for FolderClass {
    type Err = ParseFolderValueError;

    /// Accepts the stored name (`FIRST_CLASS`) as well as the kebab-case spelling
    /// (`first-class`) used on the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NO_CLASS" | "no-class" => Ok(FolderClass::NoClass),
            "INHERITED" | "inherited" => Ok(FolderClass::Inherited),
            "FIRST_CLASS" | "first-class" => Ok(FolderClass::FirstClass),
            "SECOND_CLASS" | "second-class" => Ok(FolderClass::SecondClass),
            other => Err(ParseFolderValueError::FolderClass(other.to_string())),
        }
    }
}

impl std::fmt::Display for FolderClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Whether the server holds more messages than have been downloaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoreMessages {
    Unknown,
    False,
    True,
}

impl MoreMessages {
    pub fn database_name(self) -> &'static str {
        match self {
            MoreMessages::Unknown => "unknown",
            MoreMessages::False => "false",
            MoreMessages::True => "true",
        }
    }
}

impl FromStr for MoreMessages {
    type Err = ParseFolderValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(MoreMessages::Unknown),
            "false" => Ok(MoreMessages::False),
            "true" => Ok(MoreMessages::True),
            other => Err(ParseFolderValueError::MoreMessages(other.to_string())),
        }
    }
}

impl std::fmt::Display for MoreMessages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.database_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: i64,
    pub name: String,
    pub folder_type: FolderType,
    #[serde(default)]
    pub is_local_only: bool,
}

/// Snapshot of the user-editable settings of a folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderDetails {
    pub folder: Folder,
    pub is_in_top_group: bool,
    /// Shown in the unified inbox
    pub is_integrate: bool,
    pub is_sync_enabled: bool,
    pub display_class: FolderClass,
    pub is_notifications_enabled: bool,
    pub is_push_enabled: bool,
}
