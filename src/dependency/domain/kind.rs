//! Relationship types and their per-endpoint labels.

use super::ParseDependencyTypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Relationship type of a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    /// Successor starts after the predecessor finishes.
    FinishToStart,
    /// Successor starts after the predecessor starts.
    StartToStart,
    /// Successor finishes after the predecessor finishes.
    FinishToFinish,
    /// Successor finishes after the predecessor starts.
    StartToFinish,
    /// Predecessor blocks the successor.
    Blocks,
    /// Predecessor is blocked by the successor. Normalized to [`Self::Blocks`]
    /// with endpoints swapped before storage.
    BlockedBy,
    /// Informational link with no direction.
    #[serde(alias = "related_to")]
    RelatesTo,
    /// Predecessor duplicates the successor.
    Duplicates,
}

impl DependencyType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FinishToStart => "finish_to_start",
            Self::StartToStart => "start_to_start",
            Self::FinishToFinish => "finish_to_finish",
            Self::StartToFinish => "start_to_finish",
            Self::Blocks => "blocks",
            Self::BlockedBy => "blocked_by",
            Self::RelatesTo => "relates_to",
            Self::Duplicates => "duplicates",
        }
    }

    /// Returns `true` for types that constrain execution order and must stay
    /// acyclic.
    #[must_use]
    pub const fn is_ordering_relevant(self) -> bool {
        !matches!(self, Self::RelatesTo | Self::Duplicates)
    }

    /// Returns `true` when the edge has no meaningful direction.
    #[must_use]
    pub const fn is_symmetric(self) -> bool {
        matches!(self, Self::RelatesTo)
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DependencyType {
    type Error = ParseDependencyTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "finish_to_start" | "fs" => Ok(Self::FinishToStart),
            "start_to_start" | "ss" => Ok(Self::StartToStart),
            "finish_to_finish" | "ff" => Ok(Self::FinishToFinish),
            "start_to_finish" | "sf" => Ok(Self::StartToFinish),
            "blocks" => Ok(Self::Blocks),
            "blocked_by" => Ok(Self::BlockedBy),
            "relates_to" | "related_to" => Ok(Self::RelatesTo),
            "duplicates" => Ok(Self::Duplicates),
            _ => Err(ParseDependencyTypeError(value.to_owned())),
        }
    }
}

impl FromStr for DependencyType {
    type Err = ParseDependencyTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::try_from(value)
    }
}

/// Which endpoint of an edge a view is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Perspective {
    /// Viewing from the predecessor; the other task is the successor.
    Predecessor,
    /// Viewing from the successor; the other task is the predecessor.
    Successor,
}

/// Relationship label as displayed from one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyLabel {
    /// Finish-to-start.
    FinishToStart,
    /// Start-to-start.
    StartToStart,
    /// Finish-to-finish.
    FinishToFinish,
    /// Start-to-finish.
    StartToFinish,
    /// This task blocks the other.
    Blocks,
    /// This task is blocked by the other.
    BlockedBy,
    /// Informational link.
    RelatesTo,
    /// This task duplicates the other.
    Duplicates,
    /// This task is duplicated by the other.
    DuplicatedBy,
}

impl DependencyLabel {
    /// Returns the label of `kind` as seen from `perspective`.
    #[must_use]
    pub const fn for_view(kind: DependencyType, perspective: Perspective) -> Self {
        match (kind, perspective) {
            (DependencyType::FinishToStart, _) => Self::FinishToStart,
            (DependencyType::StartToStart, _) => Self::StartToStart,
            (DependencyType::FinishToFinish, _) => Self::FinishToFinish,
            (DependencyType::StartToFinish, _) => Self::StartToFinish,
            (DependencyType::RelatesTo, _) => Self::RelatesTo,
            (DependencyType::Blocks, Perspective::Predecessor)
            | (DependencyType::BlockedBy, Perspective::Successor) => Self::Blocks,
            (DependencyType::Blocks, Perspective::Successor)
            | (DependencyType::BlockedBy, Perspective::Predecessor) => Self::BlockedBy,
            (DependencyType::Duplicates, Perspective::Predecessor) => Self::Duplicates,
            (DependencyType::Duplicates, Perspective::Successor) => Self::DuplicatedBy,
        }
    }
}
