//! Capability checks for request handlers.
//!
//! Token verification happens upstream; handlers only see the resulting [`Actor`].

use crate::error::{JoblyError, JoblyResult};

/// Who is making a request. Anonymous when `username` is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Actor {
    pub username: Option<String>,
    pub is_admin: bool,
}

impl Actor {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            is_admin: false,
        }
    }

    pub fn admin(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            is_admin: true,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.username.is_some()
    }
}

/// Minimum capability an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Capability {
    Anonymous,
    LoggedIn,
    Admin,
}

/// Fail with [`JoblyError::Unauthorized`] unless `actor` has `required`.
///
/// An admin flag without a username does not count as logged in.
pub fn authorize(actor: &Actor, required: Capability) -> JoblyResult<()> {
    let allowed = match required {
        Capability::Anonymous => true,
        Capability::LoggedIn => actor.is_logged_in(),
        Capability::Admin => actor.is_logged_in() && actor.is_admin,
    };
    if allowed {
        Ok(())
    } else {
        tracing::debug!(?required, user = actor.username.as_deref().unwrap_or("-"), "access denied");
        Err(JoblyError::unauthorized("Unauthorized"))
    }
}

pub fn ensure_logged_in(actor: &Actor) -> JoblyResult<()> {
    authorize(actor, Capability::LoggedIn)
}

pub fn ensure_admin(actor: &Actor) -> JoblyResult<()> {
    authorize(actor, Capability::Admin)
}

/// Allow admins, or the user named `username` acting on their own resources.
pub fn ensure_current_user_or_admin(actor: &Actor, username: &str) -> JoblyResult<()> {
    ensure_logged_in(actor)?;
    if actor.is_admin || actor.username.as_deref() == Some(username) {
        Ok(())
    } else {
        Err(JoblyError::unauthorized("Unauthorized"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_passes_only_anonymous() {
        let anon = Actor::anonymous();
        assert!(authorize(&anon, Capability::Anonymous).is_ok());
        assert!(authorize(&anon, Capability::LoggedIn).is_err());
        assert!(authorize(&anon, Capability::Admin).is_err());
    }

    #[test]
    fn user_is_not_admin() {
        let u = Actor::user("u1");
        assert!(ensure_logged_in(&u).is_ok());
        let err = ensure_admin(&u).unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn admin_flag_needs_username() {
        let ghost = Actor {
            username: None,
            is_admin: true,
        };
        assert!(ensure_admin(&ghost).is_err());
        assert!(ensure_admin(&Actor::admin("a1")).is_ok());
    }

    #[test]
    fn current_user_or_admin() {
        assert!(ensure_current_user_or_admin(&Actor::user("u1"), "u1").is_ok());
        assert!(ensure_current_user_or_admin(&Actor::user("u1"), "u2").is_err());
        assert!(ensure_current_user_or_admin(&Actor::admin("a1"), "u2").is_ok());
        assert!(ensure_current_user_or_admin(&Actor::anonymous(), "u1").is_err());
    }

    #[test]
    fn capabilities_are_ordered() {
        assert!(Capability::Anonymous < Capability::LoggedIn);
        assert!(Capability::LoggedIn < Capability::Admin);
    }
}
