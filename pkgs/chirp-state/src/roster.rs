//! User directory for display-name and avatar resolution

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::debug;

use crate::models::{UserId, UserProfile};

/// Base URL for deterministically derived avatars
const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/initials/svg";

/// URI-component encode set: alphanumerics and the mark characters
/// `- _ . ! ~ * ' ( )` pass through bare.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Derive a deterministic avatar URL from a display name.
///
/// Same input always yields the same URL, so generated avatars are stable
/// across sessions without storing anything.
pub fn initials_avatar_url(name: &str) -> String {
    let seed = utf8_percent_encode(name, URI_COMPONENT);
    format!("{}?seed={}", AVATAR_BASE_URL, seed)
}

/// Directory of known user profiles.
///
/// Resolves member ids to display identities when the store narrates
/// membership changes. Seeding is the embedder's job.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: Vec<UserProfile>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory pre-seeded with the given profiles
    pub fn with_users(users: Vec<UserProfile>) -> Self {
        Self { users }
    }

    /// Add or replace a profile by id
    pub fn upsert(&mut self, profile: UserProfile) {
        debug!("Upserting directory profile: {}", profile.id);

        if let Some(existing) = self.users.iter_mut().find(|u| u.id == profile.id) {
            *existing = profile;
        } else {
            self.users.push(profile);
        }
    }

    /// Get a profile by user id
    pub fn get(&self, user_id: &str) -> Option<&UserProfile> {
        self.users.iter().find(|u| u.id == user_id)
    }

    /// Resolve a user id to a display name
    pub fn display_name(&self, user_id: &str) -> Option<&str> {
        self.get(user_id).map(|u| u.name.as_str())
    }

    /// All known profiles
    pub fn all(&self) -> &[UserProfile] {
        &self.users
    }
}

impl From<Vec<(UserId, String)>> for UserDirectory {
    /// Build a directory from `(id, name)` pairs, deriving avatars from the
    /// names.
    fn from(pairs: Vec<(UserId, String)>) -> Self {
        let users = pairs
            .into_iter()
            .map(|(id, name)| UserProfile {
                avatar: initials_avatar_url(&name),
                id,
                name,
            })
            .collect();

        Self { users }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_url_is_deterministic() {
        let a = initials_avatar_url("Team");
        let b = initials_avatar_url("Team");
        assert_eq!(a, b);
        assert_eq!(a, "https://api.dicebear.com/7.x/initials/svg?seed=Team");
    }

    #[test]
    fn test_avatar_url_encodes_seed() {
        let url = initials_avatar_url("Design & Review");
        assert_eq!(
            url,
            "https://api.dicebear.com/7.x/initials/svg?seed=Design%20%26%20Review"
        );
    }

    #[test]
    fn test_avatar_url_keeps_uri_mark_characters_bare() {
        let url = initials_avatar_url("Team-1_v2.0~(beta)!*'");
        assert_eq!(
            url,
            "https://api.dicebear.com/7.x/initials/svg?seed=Team-1_v2.0~(beta)!*'"
        );
    }

    #[test]
    fn test_display_name_resolution() {
        let directory = UserDirectory::from(vec![
            ("2".to_string(), "Alice Johnson".to_string()),
            ("3".to_string(), "Bob Smith".to_string()),
        ]);

        assert_eq!(directory.display_name("2"), Some("Alice Johnson"));
        assert_eq!(directory.display_name("9"), None);
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut directory = UserDirectory::new();
        directory.upsert(UserProfile {
            id: "2".to_string(),
            name: "Alice".to_string(),
            avatar: "a".to_string(),
        });
        directory.upsert(UserProfile {
            id: "2".to_string(),
            name: "Alice Johnson".to_string(),
            avatar: "a".to_string(),
        });

        assert_eq!(directory.all().len(), 1);
        assert_eq!(directory.display_name("2"), Some("Alice Johnson"));
    }
}
