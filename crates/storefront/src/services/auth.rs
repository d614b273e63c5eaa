//! Sign-in gate for actions that need an authenticated user.
//!
//! The auth provider itself is external; the gate only tracks who is signed
//! in and defers an action until sign-in completes.

use tracing::debug;

use uphaar_core::UserId;

use crate::error::{clear_sentry_user, set_sentry_user};

/// An authenticated user identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    pub email: Option<String>,
}

impl AuthUser {
    /// Create an identity without an email.
    #[must_use]
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }
}

/// Outcome of [`AuthGate::require_auth`].
#[derive(Debug, PartialEq, Eq)]
pub enum Gate<A> {
    /// A user is signed in; run the action now.
    Proceed { user: AuthUser, action: A },
    /// No user; the action is held and the sign-in prompt is open.
    Deferred,
}

/// Holds the signed-in user and at most one deferred action.
#[derive(Debug)]
pub struct AuthGate<A> {
    user: Option<AuthUser>,
    pending: Option<A>,
    prompt_open: bool,
}

impl<A> Default for AuthGate<A> {
    fn default() -> Self {
        Self {
            user: None,
            pending: None,
            prompt_open: false,
        }
    }
}

impl<A> AuthGate<A> {
    /// A gate with nobody signed in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A gate with `user` already signed in (restored session).
    #[must_use]
    pub fn signed_in(user: AuthUser) -> Self {
        set_sentry_user(&user.id, user.email.as_deref());
        Self {
            user: Some(user),
            pending: None,
            prompt_open: false,
        }
    }

    /// The signed-in user.
    #[must_use]
    pub const fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    /// Whether the sign-in prompt is showing.
    #[must_use]
    pub const fn is_prompt_open(&self) -> bool {
        self.prompt_open
    }

    /// Whether an action is waiting for sign-in.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Run `action` now if signed in; otherwise hold it and open the prompt.
    ///
    /// A newer deferred action replaces an older one.
    pub fn require_auth(&mut self, action: A) -> Gate<A> {
        if let Some(user) = &self.user {
            return Gate::Proceed {
                user: user.clone(),
                action,
            };
        }

        debug!("Deferring action until sign-in");
        self.pending = Some(action);
        self.prompt_open = true;
        Gate::Deferred
    }

    /// Record a completed sign-in and close the prompt.
    ///
    /// Returns the deferred action, if any, exactly once.
    pub fn complete_sign_in(&mut self, user: AuthUser) -> Option<A> {
        set_sentry_user(&user.id, user.email.as_deref());
        let newly_signed_in = self.user.is_none();
        self.user = Some(user);
        self.prompt_open = false;

        if newly_signed_in { self.pending.take() } else { None }
    }

    /// Close the prompt without signing in. A deferred action stays held.
    pub fn dismiss_prompt(&mut self) {
        self.prompt_open = false;
    }

    /// Sign out.
    pub fn sign_out(&mut self) {
        clear_sentry_user();
        self.user = None;
    }
}
