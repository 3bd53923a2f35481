//! Credential Forms
//!
//! Registration and login submission, independent of any UI toolkit.
//! Redirecting after success is left to the session mirror.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::domain::{AuthUser, UserProfile};
use crate::error::PlatformError;
use crate::repository::{DocumentStore, IdentityProvider, TodoRepository};

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Client-side registration rule violations, in checking order.
///
/// `Display` gives the message shown on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Password doesn't match")]
    PasswordMismatch,
    #[error("Password should be at least 6 characters")]
    PasswordTooShort,
    #[error("Invalid email")]
    InvalidEmail,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Values entered on the registration form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Registration {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// Report the first failing rule
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }
}

/// Clears the in-flight flag when the submission finishes, however it ends
struct InFlightGuard<'a>(&'a Cell<bool>);

impl<'a> InFlightGuard<'a> {
    /// `None` if a submission is already running
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        (!flag.replace(true)).then_some(Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegisterOutcome {
    /// A client-side rule failed; nothing was sent
    Invalid(ValidationError),
    /// Another submission is still running; this one was ignored
    InFlight,
    Registered(AuthUser),
    /// Account creation or profile write failed; already logged
    Failed(PlatformError),
}

pub struct RegisterFlow {
    identity: Rc<dyn IdentityProvider>,
    repo: TodoRepository,
    in_flight: Cell<bool>,
}

impl RegisterFlow {
    pub fn new(identity: Rc<dyn IdentityProvider>, documents: Rc<dyn DocumentStore>) -> Self {
        Self {
            identity,
            repo: TodoRepository::new(documents),
            in_flight: Cell::new(false),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.get()
    }

    /// Validate, create the account, then write the profile document
    pub async fn submit(&self, form: &Registration) -> RegisterOutcome {
        if let Err(invalid) = form.validate() {
            return RegisterOutcome::Invalid(invalid);
        }
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            return RegisterOutcome::InFlight;
        };

        let user = match self
            .identity
            .create_account(&form.email, &form.password)
            .await
        {
            Ok(user) => user,
            Err(err) => {
                log::error!("Registration failed: {err}");
                return RegisterOutcome::Failed(err);
            }
        };

        let profile = UserProfile::new(user.uid.clone(), form.name.clone(), form.email.clone());
        if let Err(err) = self.repo.save_profile(&profile).await {
            log::error!("Saving profile for {} failed: {err}", user.uid);
            return RegisterOutcome::Failed(err);
        }

        log::info!("User registered successfully");
        RegisterOutcome::Registered(user)
    }
}

/// Shown for every sign-in failure, whatever the cause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("User does not exist")]
pub struct LoginRejected;

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    InFlight,
    SignedIn(AuthUser),
    Rejected(LoginRejected),
}

pub struct LoginFlow {
    identity: Rc<dyn IdentityProvider>,
    in_flight: Cell<bool>,
}

impl LoginFlow {
    pub fn new(identity: Rc<dyn IdentityProvider>) -> Self {
        Self {
            identity,
            in_flight: Cell::new(false),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.get()
    }

    pub async fn submit(&self, email: &str, password: &str) -> LoginOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            return LoginOutcome::InFlight;
        };

        match self.identity.sign_in(email, password).await {
            Ok(user) => LoginOutcome::SignedIn(user),
            Err(err) => {
                log::warn!("Sign-in failed: {err}");
                LoginOutcome::Rejected(LoginRejected)
            }
        }
    }
}
