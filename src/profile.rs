//! The profile data model.
//!
//! A profile is a labelled bundle of git identity fields plus a selection flag.
//! Every mutation here produces a whole new collection rather than editing a
//! single record in place, so the "at most one selected" rule holds for
//! whatever gets persisted next.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A git identity profile as stored in the settings document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub label: String,
    pub email: String,
    pub user_name: String,
    #[serde(default)]
    pub selected: bool,
    pub id: String,
    /// Empty means signing is not configured
    #[serde(default)]
    pub signing_key: String,
}

impl Profile {
    /// Create a fresh, selected profile with a newly generated id
    pub fn new(
        label: impl Into<String>,
        user_name: impl Into<String>,
        email: impl Into<String>,
        signing_key: Option<String>,
    ) -> Self {
        Self {
            label: label.into(),
            email: email.into(),
            user_name: user_name.into(),
            selected: true,
            id: Uuid::new_v4().to_string(),
            signing_key: signing_key.unwrap_or_default(),
        }
    }

    pub fn has_signing_key(&self) -> bool {
        !self.signing_key.is_empty()
    }

    /// `Name <email>`, as shown in menus and the status line
    pub fn identity(&self) -> String {
        format!("{} <{}>", self.user_name, self.email)
    }
}

/// Append `profile` as the only selected entry
pub fn with_new_selected(profiles: Vec<Profile>, mut profile: Profile) -> Vec<Profile> {
    profile.selected = true;
    let mut out: Vec<Profile> = profiles
        .into_iter()
        .map(|p| Profile {
            selected: false,
            ..p
        })
        .collect();
    out.push(profile);
    out
}

/// Re-derive every `selected` flag so that only `id` is selected.
///
/// Returns `None` when no profile carries `id`; the caller treats that as a no-op.
pub fn select_only(profiles: &[Profile], id: &str) -> Option<Vec<Profile>> {
    if !profiles.iter().any(|p| p.id == id) {
        return None;
    }

    Some(
        profiles
            .iter()
            .map(|p| Profile {
                selected: p.id == id,
                ..p.clone()
            })
            .collect(),
    )
}

/// The active profile; first match wins if the file was edited by hand
pub fn active(profiles: &[Profile]) -> Option<&Profile> {
    profiles.iter().find(|p| p.selected)
}

/// Find a profile by exact id, falling back to label
pub fn find<'a>(profiles: &'a [Profile], key: &str) -> Option<&'a Profile> {
    profiles
        .iter()
        .find(|p| p.id == key)
        .or_else(|| profiles.iter().find(|p| p.label == key))
}

#[cfg(test)]
pub(crate) fn fixture(label: &str, id: &str, selected: bool) -> Profile {
    Profile {
        label: label.to_string(),
        email: format!("{}@example.com", label.to_lowercase()),
        user_name: label.to_string(),
        selected,
        id: id.to_string(),
        signing_key: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected_count(profiles: &[Profile]) -> usize {
        profiles.iter().filter(|p| p.selected).count()
    }

    #[test]
    fn test_new_profile_is_selected_with_unique_id() {
        let a = Profile::new("Work", "Alice", "a@x.com", None);
        let b = Profile::new("Work", "Alice", "a@x.com", None);
        assert!(a.selected);
        assert!(!a.has_signing_key());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serialized_shape() {
        let mut p = fixture("Work", "id-1", true);
        p.signing_key = "ABCD1234".to_string();
        let value = serde_json::to_value(&p).unwrap();
        let obj = value.as_object().unwrap();
        for key in ["label", "email", "userName", "selected", "id", "signingKey"] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert_eq!(obj.len(), 6);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"label":"L","email":"e@x","userName":"U","id":"1"}"#;
        let p: Profile = serde_json::from_str(json).unwrap();
        assert!(!p.selected);
        assert_eq!(p.signing_key, "");
    }

    #[test]
    fn test_with_new_selected_clears_siblings() {
        let existing = vec![fixture("A", "1", true), fixture("B", "2", false)];
        let out = with_new_selected(existing, fixture("C", "3", false));
        assert_eq!(out.len(), 3);
        assert_eq!(selected_count(&out), 1);
        assert_eq!(active(&out).unwrap().id, "3");
        assert_eq!(out[0].label, "A");
    }

    #[test]
    fn test_select_only_recomputes_all_flags() {
        // Hand-edited file with two selected entries
        let profiles = vec![
            fixture("A", "1", true),
            fixture("B", "2", true),
            fixture("C", "3", false),
        ];
        let out = select_only(&profiles, "3").unwrap();
        assert_eq!(selected_count(&out), 1);
        assert!(out[2].selected);
    }

    #[test]
    fn test_select_only_idempotent() {
        let profiles = vec![fixture("A", "1", false), fixture("B", "2", false)];
        let once = select_only(&profiles, "2").unwrap();
        let twice = select_only(&once, "2").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_select_only_unknown_id() {
        let profiles = vec![fixture("A", "1", true)];
        assert!(select_only(&profiles, "nope").is_none());
    }

    #[test]
    fn test_active_first_match() {
        let profiles = vec![fixture("A", "1", false), fixture("B", "2", true), fixture("C", "3", true)];
        assert_eq!(active(&profiles).unwrap().id, "2");
        assert!(active(&[]).is_none());
    }

    #[test]
    fn test_find_by_id_then_label() {
        let profiles = vec![fixture("Work", "1", false), fixture("2", "2b", false)];
        assert_eq!(find(&profiles, "1").unwrap().label, "Work");
        assert_eq!(find(&profiles, "Work").unwrap().id, "1");
        assert_eq!(find(&profiles, "2").unwrap().id, "2b");
        assert!(find(&profiles, "Home").is_none());
    }
}
