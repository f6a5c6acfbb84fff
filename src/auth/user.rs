//! Identity types exchanged with the identity provider.

use std::collections::BTreeMap;

/// A contact attribute the user can verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactAttribute {
    Email,
    PhoneNumber,
}

impl ContactAttribute {
    pub const ALL: [ContactAttribute; 2] = [ContactAttribute::Email, ContactAttribute::PhoneNumber];

    /// User-pool attribute name.
    pub fn attribute_name(&self) -> &'static str {
        match self {
            ContactAttribute::Email => "email",
            ContactAttribute::PhoneNumber => "phone_number",
        }
    }

    /// User-pool attribute that flags this contact as verified.
    pub fn verified_flag(&self) -> &'static str {
        match self {
            ContactAttribute::Email => "email_verified",
            ContactAttribute::PhoneNumber => "phone_number_verified",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContactAttribute::Email => "Email",
            ContactAttribute::PhoneNumber => "Phone Number",
        }
    }
}

impl std::fmt::Display for ContactAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A signed-in user as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthUser {
    pub username: String,
    pub attributes: BTreeMap<String, String>,
}

impl AuthUser {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Contact attributes present on the account.
    pub fn contact_attributes(&self) -> Vec<ContactAttribute> {
        ContactAttribute::ALL
            .into_iter()
            .filter(|attr| {
                self.attribute(attr.attribute_name())
                    .is_some_and(|v| !v.is_empty())
            })
            .collect()
    }

    pub fn is_verified(&self, attribute: ContactAttribute) -> bool {
        self.attribute(attribute.verified_flag()) == Some("true")
    }

    /// Contacts present but not yet verified.
    pub fn unverified_contacts(&self) -> Vec<ContactAttribute> {
        self.contact_attributes()
            .into_iter()
            .filter(|attr| !self.is_verified(*attr))
            .collect()
    }

    /// True when the account has contact attributes but none of them verified.
    pub fn needs_contact_verification(&self) -> bool {
        let contacts = self.contact_attributes();
        !contacts.is_empty() && contacts.iter().all(|attr| !self.is_verified(*attr))
    }

    /// Name shown in the shell header.
    pub fn display_name(&self) -> &str {
        self.attribute("email").unwrap_or(&self.username)
    }
}

/// Kind of extra step the provider requires before issuing a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeKind {
    SmsMfa,
    SoftwareTokenMfa,
    NewPasswordRequired,
}

impl ChallengeKind {
    /// Parse a user-pool challenge name.
    pub fn from_challenge_name(name: &str) -> Option<Self> {
        match name {
            "SMS_MFA" => Some(ChallengeKind::SmsMfa),
            "SOFTWARE_TOKEN_MFA" => Some(ChallengeKind::SoftwareTokenMfa),
            "NEW_PASSWORD_REQUIRED" => Some(ChallengeKind::NewPasswordRequired),
            _ => None,
        }
    }

    pub fn challenge_name(&self) -> &'static str {
        match self {
            ChallengeKind::SmsMfa => "SMS_MFA",
            ChallengeKind::SoftwareTokenMfa => "SOFTWARE_TOKEN_MFA",
            ChallengeKind::NewPasswordRequired => "NEW_PASSWORD_REQUIRED",
        }
    }

    /// Response key carrying the user's answer.
    pub fn answer_key(&self) -> &'static str {
        match self {
            ChallengeKind::SmsMfa => "SMS_MFA_CODE",
            ChallengeKind::SoftwareTokenMfa => "SOFTWARE_TOKEN_MFA_CODE",
            ChallengeKind::NewPasswordRequired => "NEW_PASSWORD",
        }
    }
}

impl std::fmt::Display for ChallengeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChallengeKind::SmsMfa => write!(f, "SMS code"),
            ChallengeKind::SoftwareTokenMfa => write!(f, "Authenticator code"),
            ChallengeKind::NewPasswordRequired => write!(f, "New password"),
        }
    }
}

/// A challenge awaiting the user's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChallenge {
    pub kind: ChallengeKind,
    pub username: String,
    /// Provider continuation token; opaque to the shell.
    pub session: String,
    /// Where the code was sent, for display.
    pub destination: Option<String>,
}

/// Where the provider delivered a code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeDelivery {
    pub destination: Option<String>,
    pub medium: Option<String>,
}

impl CodeDelivery {
    pub fn to(destination: impl Into<String>) -> Self {
        Self {
            destination: Some(destination.into()),
            medium: None,
        }
    }
}

/// Result of a sign-in step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    SignedIn(AuthUser),
    Challenge(PendingChallenge),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_attributes() {
        let user = AuthUser::new("alice")
            .with_attribute("email", "a@example.com")
            .with_attribute("phone_number", "");
        assert_eq!(user.contact_attributes(), vec![ContactAttribute::Email]);
    }

    #[test]
    fn test_needs_contact_verification() {
        let none = AuthUser::new("alice");
        assert!(!none.needs_contact_verification());

        let unverified = AuthUser::new("alice")
            .with_attribute("email", "a@example.com")
            .with_attribute("phone_number", "+61400000000")
            .with_attribute("email_verified", "false");
        assert!(unverified.needs_contact_verification());
        assert_eq!(unverified.unverified_contacts().len(), 2);

        let one_verified = unverified.with_attribute("phone_number_verified", "true");
        assert!(!one_verified.needs_contact_verification());
        assert_eq!(
            one_verified.unverified_contacts(),
            vec![ContactAttribute::Email]
        );
    }

    #[test]
    fn test_display_name_prefers_email() {
        assert_eq!(AuthUser::new("alice").display_name(), "alice");
        assert_eq!(
            AuthUser::new("alice")
                .with_attribute("email", "a@example.com")
                .display_name(),
            "a@example.com"
        );
    }

    #[test]
    fn test_challenge_names() {
        for kind in [
            ChallengeKind::SmsMfa,
            ChallengeKind::SoftwareTokenMfa,
            ChallengeKind::NewPasswordRequired,
        ] {
            assert_eq!(ChallengeKind::from_challenge_name(kind.challenge_name()), Some(kind));
        }
        assert_eq!(ChallengeKind::from_challenge_name("CUSTOM_CHALLENGE"), None);
        assert_eq!(ChallengeKind::SmsMfa.to_string(), "SMS code");
    }
}
