//! crates/career_portal_core/src/placeholder.rs
//!
//! Fixed sample data shown while the store is unreachable. Only ever handed
//! out inside `Loaded::Degraded`.

use crate::domain::{JobListing, ResourceCategory, ResourceEntry, ResourceKind};
use crate::error::PortalError;

/// The outcome of a listing load.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    /// Records fetched from the store. May be legitimately empty.
    Live(Vec<T>),
    /// The fetch failed; `records` is placeholder data for display only.
    Degraded { records: Vec<T>, error: PortalError },
}

impl<T> Loaded<T> {
    pub fn records(&self) -> &[T] {
        match self {
            Loaded::Live(records) | Loaded::Degraded { records, .. } => records,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Loaded::Degraded { .. })
    }

    pub fn error(&self) -> Option<&PortalError> {
        match self {
            Loaded::Live(_) => None,
            Loaded::Degraded { error, .. } => Some(error),
        }
    }
}

fn sample_job(
    id: &str,
    title: &str,
    company: &str,
    location: &str,
    employment_type: &str,
    salary: &str,
    description: &str,
) -> JobListing {
    JobListing {
        id: id.to_string(),
        title: title.to_string(),
        company: company.to_string(),
        description: description.to_string(),
        location: location.to_string(),
        employment_type: employment_type.to_string(),
        salary: salary.to_string(),
        tags: Vec::new(),
        applicants: Vec::new(),
        applicant_count: 0,
        has_applied: false,
    }
}

pub fn sample_jobs() -> Vec<JobListing> {
    vec![
        sample_job(
            "sample-1",
            "Frontend Developer",
            "TechCorp",
            "Remote",
            "Full-time",
            "$60,000 - $80,000",
            "Join our team as a Frontend Developer...",
        ),
        sample_job(
            "sample-2",
            "UI/UX Designer",
            "DesignStudio",
            "New York",
            "Contract",
            "$50,000 - $70,000",
            "We are looking for a creative UI/UX Designer...",
        ),
    ]
}

fn sample_resource(
    id: &str,
    title: &str,
    description: &str,
    category: ResourceCategory,
    kind: ResourceKind,
    tags: &[&str],
) -> ResourceEntry {
    ResourceEntry {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category,
        kind,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        url: "#".to_string(),
    }
}

pub fn sample_resources() -> Vec<ResourceEntry> {
    vec![
        sample_resource(
            "sample-1",
            "Resume Writing Guide",
            "Complete guide to writing a professional resume that gets noticed by employers.",
            ResourceCategory::Guides,
            ResourceKind::Article,
            &["resume", "career", "job search"],
        ),
        sample_resource(
            "sample-2",
            "Interview Preparation Checklist",
            "Essential checklist to prepare for your next job interview.",
            ResourceCategory::Templates,
            ResourceKind::Template,
            &["interview", "preparation", "career"],
        ),
        sample_resource(
            "sample-3",
            "JavaScript Fundamentals Course",
            "Learn JavaScript from basics to advanced concepts with hands-on projects.",
            ResourceCategory::Courses,
            ResourceKind::Course,
            &["javascript", "programming", "web development"],
        ),
        sample_resource(
            "sample-4",
            "LinkedIn Profile Optimization",
            "Video tutorial on how to optimize your LinkedIn profile for maximum visibility.",
            ResourceCategory::Videos,
            ResourceKind::Video,
            &["linkedin", "networking", "profile"],
        ),
    ]
}
