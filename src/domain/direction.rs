//! Child resource direction policy
//!
//! Volumes and drives live in the same volume table and both point at an
//! array, but through different link columns:
//!
//! - a volume is *created from* an array and records it in `from_array_id`
//! - a drive is raw capacity *allocated to* an array and records it in `to_array_id`
//!
//! `ChildKind` is the static policy that tells the generic child handler
//! which link is authoritative, what the resource is called on the wire, and
//! which mutations are allowed.

use super::ids::ArrayId;
use super::records::VolumeRecord;

/// Which link column on a volume record ties it to an array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Created by the array (`from_array_id`)
    From,
    /// Allocated to the array (`to_array_id`)
    To,
}

impl Direction {
    /// Name of the link column this direction reads
    pub fn link_column(&self) -> &'static str {
        match self {
            Direction::From => "from_array_id",
            Direction::To => "to_array_id",
        }
    }

    /// Read the owning array from a record
    pub fn owner(&self, record: &VolumeRecord) -> Option<ArrayId> {
        match self {
            Direction::From => record.from_array_id,
            Direction::To => record.to_array_id,
        }
    }
}

/// Kind of child resource exposed under an array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildKind {
    Volume,
    Drive,
}

impl ChildKind {
    pub const ALL: [ChildKind; 2] = [ChildKind::Volume, ChildKind::Drive];

    pub fn direction(&self) -> Direction {
        match self {
            ChildKind::Volume => Direction::From,
            ChildKind::Drive => Direction::To,
        }
    }

    /// Key wrapping a list response, and the route segment
    pub fn collection_name(&self) -> &'static str {
        match self {
            ChildKind::Volume => "volumes",
            ChildKind::Drive => "drives",
        }
    }

    /// Key wrapping a single-resource request or response body
    pub fn member_name(&self) -> &'static str {
        match self {
            ChildKind::Volume => "volume",
            ChildKind::Drive => "drive",
        }
    }

    /// Drives are provisioned through array lifecycle, never directly
    pub fn allows_create(&self) -> bool {
        matches!(self, ChildKind::Volume)
    }

    pub fn allows_update(&self) -> bool {
        matches!(self, ChildKind::Volume)
    }
}

impl std::fmt::Display for ChildKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.member_name())
    }
}
