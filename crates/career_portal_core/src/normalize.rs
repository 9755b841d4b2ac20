//! crates/career_portal_core/src/normalize.rs
//!
//! Maps heterogeneous store documents into normalized records: alternative
//! field names, fallback values, and the applicant list encoded as
//! `Applicant_<n>` fields on job documents.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::domain::{
    ApplicantRecord, ApplicationRecord, ApplicationStatus, Document, Identity, JobListing,
    ResourceCategory, ResourceEntry, ResourceKind, StoredDocument,
};

/// Reserved prefix of the fields that hold a job's applicants.
pub const APPLICANT_PREFIX: &str = "Applicant_";

pub const UNTITLED_JOB: &str = "Untitled position";
pub const NO_COMPANY: &str = "Company not specified";
pub const NO_DESCRIPTION: &str = "Job description not available.";
pub const NOT_SPECIFIED: &str = "Not specified";
pub const UNTITLED_RESOURCE: &str = "Untitled resource";

const TITLE_FIELDS: &[&str] = &["title", "jobTitle", "Title"];
const COMPANY_FIELDS: &[&str] = &["company", "companyName", "Company"];
const DESCRIPTION_FIELDS: &[&str] = &["description", "details", "Description"];
const LOCATION_FIELDS: &[&str] = &["location", "Location"];
const EMPLOYMENT_TYPE_FIELDS: &[&str] = &["type", "employmentType", "jobType"];
const SALARY_FIELDS: &[&str] = &["salary", "Salary"];
const TAG_FIELDS: &[&str] = &["tags", "skills"];

/// Parses the ordinal out of an `Applicant_<n>` field name.
/// Returns `None` for anything that is not exactly the prefix followed by a positive integer.
///
/// Ordinals beyond `u64::MAX` saturate, so every reserved-prefix field still
/// counts as an applicant.
pub fn applicant_ordinal(field_name: &str) -> Option<u64> {
    let digits = field_name.strip_prefix(APPLICANT_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.bytes().all(|b| b == b'0') {
        return None;
    }
    Some(digits.parse::<u64>().unwrap_or(u64::MAX))
}

pub fn applicant_field_name(ordinal: u64) -> String {
    format!("{APPLICANT_PREFIX}{ordinal}")
}

/// Collects the applicants of a job document, ordered by ordinal.
pub fn parse_applicants(fields: &Document) -> Vec<ApplicantRecord> {
    let mut applicants: Vec<ApplicantRecord> = fields
        .iter()
        .filter_map(|(name, value)| {
            let ordinal = applicant_ordinal(name)?;
            let email = value.as_str()?;
            Some(ApplicantRecord {
                ordinal,
                email: email.to_string(),
            })
        })
        .collect();
    applicants.sort_by_key(|a| a.ordinal);
    applicants
}

pub fn normalize_job(doc: &StoredDocument, viewer: Option<&Identity>) -> JobListing {
    let fields = &doc.fields;
    let applicants = parse_applicants(fields);
    let has_applied = viewer.is_some_and(|identity| {
        applicants.iter().any(|a| a.email == identity.email)
    });

    JobListing {
        id: doc.key.clone(),
        title: text_or(fields, TITLE_FIELDS, UNTITLED_JOB),
        company: text_or(fields, COMPANY_FIELDS, NO_COMPANY),
        description: text_or(fields, DESCRIPTION_FIELDS, NO_DESCRIPTION),
        location: text_or(fields, LOCATION_FIELDS, NOT_SPECIFIED),
        employment_type: text_or(fields, EMPLOYMENT_TYPE_FIELDS, NOT_SPECIFIED),
        salary: text_or(fields, SALARY_FIELDS, NOT_SPECIFIED),
        tags: string_list(fields, TAG_FIELDS),
        applicant_count: applicants.len(),
        applicants,
        has_applied,
    }
}

pub fn normalize_resource(doc: &StoredDocument) -> ResourceEntry {
    let fields = &doc.fields;
    let category = match first_text(fields, &["category"]) {
        Some(raw) => raw.parse().unwrap_or_else(|err| {
            debug!(resource = %doc.key, "{err}; filing under Articles");
            ResourceCategory::Articles
        }),
        None => ResourceCategory::Articles,
    };
    let kind = first_text(fields, &["type"])
        .map(|tag| ResourceKind::from_tag(&tag))
        .unwrap_or(ResourceKind::Link);

    ResourceEntry {
        id: doc.key.clone(),
        title: text_or(fields, &["title"], UNTITLED_RESOURCE),
        description: text_or(fields, &["description"], ""),
        category,
        kind,
        tags: string_list(fields, &["tags"]),
        url: text_or(fields, &["url", "link"], "#"),
    }
}

pub fn normalize_application(doc: &StoredDocument) -> ApplicationRecord {
    let fields = &doc.fields;
    ApplicationRecord {
        id: doc.key.clone(),
        job_id: text_or(fields, &["jobId"], ""),
        user_id: text_or(fields, &["userId"], ""),
        status: first_text(fields, &["status"])
            .and_then(|s| ApplicationStatus::parse(&s))
            .unwrap_or_default(),
        applied_at: first_text(fields, &["appliedAt"])
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|t| t.with_timezone(&Utc)),
    }
}

/// The first non-blank text value among `names`. Numbers are rendered as text.
pub(crate) fn first_text(fields: &Document, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| match fields.get(*name)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn text_or(fields: &Document, names: &[&str], fallback: &str) -> String {
    first_text(fields, names).unwrap_or_else(|| fallback.to_string())
}

/// Accepts either an array of strings or a comma-separated string.
fn string_list(fields: &Document, names: &[&str]) -> Vec<String> {
    names
        .iter()
        .find_map(|name| match fields.get(*name)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            ),
            Value::String(s) => Some(
                s.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            _ => None,
        })
        .unwrap_or_default()
}
