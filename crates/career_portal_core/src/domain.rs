//! crates/career_portal_core/src/domain.rs
//!
//! Defines the pure, core data structures for the portal.
//! Raw documents from the store are mapped into these by `normalize`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A raw document as held by the document store: free-form top-level fields.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// A document together with its key inside a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub key: String,
    pub fields: Document,
}

/// The named collections the portal reads from and writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Jobs,
    Resources,
    Users,
    Applications,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Jobs => "Jobs",
            Collection::Resources => "Resources",
            Collection::Users => "Users",
            Collection::Applications => "Applications",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// The signed-in user, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// One applicant on a job: the ordinal from its `Applicant_<n>` field and the stored email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub ordinal: u64,
    pub email: String,
}

/// A job listing after normalization.
///
/// `applicant_count` and `has_applied` are derived from `applicants` and the
/// identity that was current when the listing was loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub id: String,
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    pub employment_type: String,
    pub salary: String,
    pub tags: Vec<String>,
    pub applicants: Vec<ApplicantRecord>,
    pub applicant_count: usize,
    pub has_applied: bool,
}

/// The fixed set of resource categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceCategory {
    Articles,
    Videos,
    Courses,
    Tools,
    Templates,
    Guides,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 6] = [
        ResourceCategory::Articles,
        ResourceCategory::Videos,
        ResourceCategory::Courses,
        ResourceCategory::Tools,
        ResourceCategory::Templates,
        ResourceCategory::Guides,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceCategory::Articles => "Articles",
            ResourceCategory::Videos => "Videos",
            ResourceCategory::Courses => "Courses",
            ResourceCategory::Tools => "Tools",
            ResourceCategory::Templates => "Templates",
            ResourceCategory::Guides => "Guides",
        }
    }
}

impl FromStr for ResourceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown resource category '{s}'"))
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selects the icon a resource is presented with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Video,
    Course,
    Template,
    Article,
    Link,
}

impl ResourceKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "video" => ResourceKind::Video,
            "course" => ResourceKind::Course,
            "template" => ResourceKind::Template,
            "article" => ResourceKind::Article,
            _ => ResourceKind::Link,
        }
    }
}

/// A learning resource after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: ResourceCategory,
    pub kind: ResourceKind,
    pub tags: Vec<String>,
    pub url: String,
}

/// The editable part of a user document. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub career_track: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Some(ApplicationStatus::Pending),
            "reviewed" => Some(ApplicationStatus::Reviewed),
            "accepted" => Some(ApplicationStatus::Accepted),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

/// An application made by one identity. Read-only once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: String,
    pub job_id: String,
    pub user_id: String,
    pub status: ApplicationStatus,
    pub applied_at: Option<DateTime<Utc>>,
}
