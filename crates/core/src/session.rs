// Session identity passed to every registry call
//
// The registry never looks up the session itself; the caller (HTTP adapter,
// CLI, test) resolves it and hands it over explicitly.

use uuid::Uuid;

use crate::error::{RegistryError, Result};
use crate::i18n::{normalize_locale, DEFAULT_LOCALE};

/// Authenticated user attached to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub is_admin: bool,
}

/// Identity and locale of the caller for a single registry call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// None when the caller is not signed in
    pub user: Option<SessionUser>,
    /// Locale used to render failure messages
    pub locale: String,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl SessionContext {
    /// Caller without a session
    pub fn anonymous() -> Self {
        Self {
            user: None,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }

    /// Session for a signed-in user
    pub fn for_user(user: SessionUser) -> Self {
        Self {
            user: Some(user),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }

    /// Administrator session used in no-auth (dev) mode
    pub fn local_admin() -> Self {
        Self::for_user(SessionUser {
            id: Uuid::nil(),
            email: "admin@local".to_string(),
            is_admin: true,
        })
    }

    /// Set the locale from a language tag such as "zh-CN"
    pub fn with_locale(mut self, tag: &str) -> Self {
        self.locale = normalize_locale(tag).to_string();
        self
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }

    /// Fail with `NotAllowed` unless the session belongs to an administrator
    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            tracing::warn!(
                user = ?self.user.as_ref().map(|u| &u.email),
                "Rejected non-admin call to admin operation"
            );
            Err(RegistryError::NotAllowed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_is_not_admin() {
        let session = SessionContext::anonymous();
        assert!(!session.is_admin());
        assert!(matches!(
            session.require_admin(),
            Err(RegistryError::NotAllowed)
        ));
    }

    #[test]
    fn test_non_admin_user_is_rejected() {
        let session = SessionContext::for_user(SessionUser {
            id: Uuid::now_v7(),
            email: "user@example.com".to_string(),
            is_admin: false,
        });
        assert!(session.require_admin().is_err());
    }

    #[test]
    fn test_local_admin_passes() {
        let session = SessionContext::local_admin();
        assert!(session.is_admin());
        assert!(session.require_admin().is_ok());
    }

    #[test]
    fn test_with_locale_normalizes() {
        let session = SessionContext::anonymous().with_locale("zh-TW");
        assert_eq!(session.locale, "zh");
        let session = SessionContext::anonymous().with_locale("pt-BR");
        assert_eq!(session.locale, DEFAULT_LOCALE);
    }
}
