//! crates/career_portal_core/src/profile.rs
//!
//! Profile form state. A save replaces the stored `profile` object of the
//! user's document wholesale.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Document, UserProfile};

/// Field of the user document the profile lives under.
pub const PROFILE_FIELD: &str = "profile";

/// The profile form as submitted. Skills arrive as one comma-separated string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileForm {
    pub bio: String,
    pub skills: String,
    pub experience: String,
    pub location: String,
    pub education: String,
    pub career_track: String,
}

/// Splits a comma-separated skills string, trimming each entry and dropping empty ones.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl ProfileForm {
    /// Pre-fills the form from a stored profile.
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            bio: profile.bio.clone().unwrap_or_default(),
            skills: profile.skills.join(", "),
            experience: profile.experience.clone().unwrap_or_default(),
            location: profile.location.clone().unwrap_or_default(),
            education: profile.education.clone().unwrap_or_default(),
            career_track: profile.career_track.clone().unwrap_or_default(),
        }
    }

    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            bio: optional(&self.bio),
            skills: parse_skills(&self.skills),
            experience: optional(&self.experience),
            location: optional(&self.location),
            education: optional(&self.education),
            career_track: optional(&self.career_track),
        }
    }
}

/// Reads the profile out of a user document. Missing or malformed profiles read as empty.
pub fn profile_from_document(fields: &Document) -> UserProfile {
    fields
        .get(PROFILE_FIELD)
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default()
}

/// The patch that overwrites the stored profile object.
pub fn profile_patch(profile: &UserProfile) -> Document {
    let mut patch = Document::new();
    let value = serde_json::to_value(profile).unwrap_or(Value::Null);
    patch.insert(PROFILE_FIELD.to_string(), value);
    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn skills_are_split_and_trimmed_in_order() {
        assert_eq!(
            parse_skills(" Rust,  SQL ,, Docker ,"),
            vec!["Rust", "SQL", "Docker"]
        );
        assert!(parse_skills("").is_empty());
    }

    #[test]
    fn form_converts_blank_fields_to_absent() {
        let profile = ProfileForm {
            bio: "Hello".into(),
            skills: "React, Node.js".into(),
            location: "   ".into(),
            ..Default::default()
        }
        .into_profile();
        assert_eq!(profile.bio.as_deref(), Some("Hello"));
        assert_eq!(profile.skills, vec!["React", "Node.js"]);
        assert_eq!(profile.location, None);
    }

    #[test]
    fn document_without_profile_reads_as_default() {
        let doc = json!({ "email": "a@x.com" }).as_object().cloned().unwrap();
        assert_eq!(profile_from_document(&doc), UserProfile::default());
    }

    #[test]
    fn patch_uses_camel_case_keys() {
        let profile = UserProfile {
            career_track: Some("Data".into()),
            skills: vec!["SQL".into()],
            ..Default::default()
        };
        let patch = profile_patch(&profile);
        assert_eq!(
            patch.get(PROFILE_FIELD),
            Some(&json!({ "careerTrack": "Data", "skills": ["SQL"] }))
        );
        assert_eq!(profile_from_document(&patch), profile);
    }

    #[test]
    fn form_prefill_joins_skills() {
        let profile = UserProfile {
            skills: vec!["Go".into(), "Kotlin".into()],
            ..Default::default()
        };
        assert_eq!(ProfileForm::from_profile(&profile).skills, "Go, Kotlin");
    }
}
