//! # External Identity Profile
//!
//! The shape an external identity provider hands back after a successful
//! OAuth handshake. The provider is trusted: this data never runs through
//! the user validator, and the repository synthesizes missing pieces
//! (display name, email placeholder) deterministically.

use serde::{Deserialize, Serialize};

/// Profile delivered by the identity provider after the OAuth handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthProfile {
    /// The provider's stable account identifier.
    pub provider_id: String,
    /// Display name, if the account has one.
    pub display_name: Option<String>,
    /// Login/username at the provider.
    pub username: Option<String>,
    /// Email addresses, most-preferred first. May be empty.
    #[serde(default)]
    pub emails: Vec<String>,
    /// Avatar URLs, most-preferred first. May be empty.
    #[serde(default)]
    pub photos: Vec<String>,
}

impl OAuthProfile {
    /// The name to store: display name, falling back to the username,
    /// falling back to the provider id.
    pub fn preferred_name(&self) -> String {
        self.display_name
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| self.username.clone().filter(|s| !s.is_empty()))
            .unwrap_or_else(|| self.provider_id.clone())
    }

    /// The email to store: the profile's first email, or a deterministic
    /// placeholder derived from the username.
    pub fn email_or_placeholder(&self) -> String {
        self.emails
            .first()
            .filter(|e| !e.is_empty())
            .cloned()
            .unwrap_or_else(|| {
                format!(
                    "{}@github.com",
                    self.username.as_deref().unwrap_or(&self.provider_id)
                )
            })
    }

    /// The avatar URL to store, if any.
    pub fn avatar(&self) -> Option<&str> {
        self.photos.first().filter(|p| !p.is_empty()).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> OAuthProfile {
        OAuthProfile {
            provider_id: "8472195".into(),
            display_name: Some("Jo Fletcher".into()),
            username: Some("jofletch".into()),
            emails: vec!["jo@fletcher.dev".into()],
            photos: vec!["https://avatars.example.com/u/8472195".into()],
        }
    }

    #[test]
    fn test_preferred_name_prefers_display_name() {
        assert_eq!(profile().preferred_name(), "Jo Fletcher");
    }

    #[test]
    fn test_preferred_name_falls_back_to_username() {
        let mut p = profile();
        p.display_name = None;
        assert_eq!(p.preferred_name(), "jofletch");
        p.username = None;
        assert_eq!(p.preferred_name(), "8472195");
    }

    #[test]
    fn test_email_prefers_profile_email() {
        assert_eq!(profile().email_or_placeholder(), "jo@fletcher.dev");
    }

    #[test]
    fn test_email_placeholder_is_deterministic() {
        let mut p = profile();
        p.emails.clear();
        assert_eq!(p.email_or_placeholder(), "jofletch@github.com");
        p.username = None;
        assert_eq!(p.email_or_placeholder(), "8472195@github.com");
    }

    #[test]
    fn test_avatar_is_first_photo() {
        assert_eq!(profile().avatar(), Some("https://avatars.example.com/u/8472195"));
        let mut p = profile();
        p.photos.clear();
        assert_eq!(p.avatar(), None);
    }
}
