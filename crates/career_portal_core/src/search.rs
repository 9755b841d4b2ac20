//! crates/career_portal_core/src/search.rs
//!
//! In-memory search and filtering of normalized records. Pure functions: the
//! input slice is never touched and the output keeps the input's order.

use serde::Deserialize;
use std::str::FromStr;

use crate::domain::{JobListing, ResourceCategory, ResourceEntry};

/// Optional equality filters for job searches. Comparison ignores ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JobFilters {
    pub location: Option<String>,
    pub employment_type: Option<String>,
}

impl JobFilters {
    fn is_empty(&self) -> bool {
        blank(self.location.as_deref()) && blank(self.employment_type.as_deref())
    }

    fn matches(&self, job: &JobListing) -> bool {
        field_equals(self.location.as_deref(), &job.location)
            && field_equals(self.employment_type.as_deref(), &job.employment_type)
    }
}

/// The category selector shown above the resources list. `All` disables the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(ResourceCategory),
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "All" {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

/// Lower-cased query, or `None` when the query should not filter at all.
fn needle(term: &str) -> Option<String> {
    let term = term.trim();
    (!term.is_empty()).then(|| term.to_lowercase())
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn field_equals(wanted: Option<&str>, actual: &str) -> bool {
    match wanted.map(str::trim) {
        None | Some("") => true,
        Some(w) => w.eq_ignore_ascii_case(actual.trim()),
    }
}

pub fn job_matches(job: &JobListing, needle: &str) -> bool {
    contains(&job.title, needle)
        || contains(&job.company, needle)
        || contains(&job.description, needle)
        || job.tags.iter().any(|tag| contains(tag, needle))
}

pub fn resource_matches(resource: &ResourceEntry, needle: &str) -> bool {
    contains(&resource.title, needle)
        || contains(&resource.description, needle)
        || resource.tags.iter().any(|tag| contains(tag, needle))
}

/// Filters jobs by free text (title, company, description, tags) and `filters`.
pub fn search_jobs(jobs: &[JobListing], term: &str, filters: &JobFilters) -> Vec<JobListing> {
    let needle = needle(term);
    if needle.is_none() && filters.is_empty() {
        return jobs.to_vec();
    }
    jobs.iter()
        .filter(|job| needle.as_deref().map_or(true, |n| job_matches(job, n)))
        .filter(|job| filters.matches(job))
        .cloned()
        .collect()
}

/// Filters resources by free text (title, description, tags) and category.
pub fn filter_resources(
    resources: &[ResourceEntry],
    term: &str,
    category: CategoryFilter,
) -> Vec<ResourceEntry> {
    let needle = needle(term);
    resources
        .iter()
        .filter(|r| match category {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => r.category == c,
        })
        .filter(|r| needle.as_deref().map_or(true, |n| resource_matches(r, n)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::{sample_jobs, sample_resources};

    #[test]
    fn empty_query_returns_input_unchanged() {
        let jobs = sample_jobs();
        assert_eq!(search_jobs(&jobs, "", &JobFilters::default()), jobs);
        assert_eq!(search_jobs(&jobs, "   ", &JobFilters::default()), jobs);

        let resources = sample_resources();
        assert_eq!(
            filter_resources(&resources, "", CategoryFilter::All),
            resources
        );
    }

    #[test]
    fn job_query_is_case_insensitive_across_fields() {
        let jobs = sample_jobs();
        let by_company = search_jobs(&jobs, "designstudio", &JobFilters::default());
        assert_eq!(by_company.len(), 1);
        assert_eq!(by_company[0].title, "UI/UX Designer");

        let by_description = search_jobs(&jobs, "FRONTEND DEVELOPER", &JobFilters::default());
        assert_eq!(by_description.len(), 1);
        assert!(search_jobs(&jobs, "astronaut", &JobFilters::default()).is_empty());
    }

    #[test]
    fn job_filters_compare_exactly() {
        let jobs = sample_jobs();
        let remote = JobFilters {
            location: Some("remote".into()),
            employment_type: None,
        };
        let found = search_jobs(&jobs, "", &remote);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].location, "Remote");

        let contract_in_remote = JobFilters {
            location: Some("Remote".into()),
            employment_type: Some("Contract".into()),
        };
        assert!(search_jobs(&jobs, "", &contract_in_remote).is_empty());
    }

    #[test]
    fn search_preserves_relative_order_and_is_repeatable() {
        let jobs = sample_jobs();
        let first = search_jobs(&jobs, "e", &JobFilters::default());
        let second = search_jobs(&jobs, "e", &JobFilters::default());
        assert_eq!(first, second);
        let ids: Vec<_> = first.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["sample-1", "sample-2"]);
    }

    #[test]
    fn resources_by_category_and_text() {
        let mut resources = sample_resources();
        // A second LinkedIn entry outside the Videos category.
        let mut article = resources[0].clone();
        article.id = "extra".into();
        article.tags = vec!["LinkedIn".into()];
        resources.push(article);

        let found = filter_resources(
            &resources,
            "linkedin",
            CategoryFilter::Only(ResourceCategory::Videos),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category, ResourceCategory::Videos);
        assert_eq!(found[0].title, "LinkedIn Profile Optimization");

        let any_category = filter_resources(&resources, "LINKEDIN", CategoryFilter::All);
        assert_eq!(any_category.len(), 2);
    }

    #[test]
    fn category_filter_parses_all_and_rejects_unknown() {
        assert_eq!("All".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            "Guides".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Only(ResourceCategory::Guides))
        );
        assert!("videos".parse::<CategoryFilter>().is_err());
    }
}
