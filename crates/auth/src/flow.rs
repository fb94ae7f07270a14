//! Registration and login flow.
//!
//! The controller owns the page's stage explicitly. The page only renders
//! it and forwards form submissions; each submission is dispatched on the
//! stage to begin a registration, confirm one, or log in.

use storage::KeyValueStore;

use crate::{
    AuthError, AuthResult, FlowConfig, PendingRegistrationStore, Redirect, RegistrationDraft,
    UserRecord, UserStore, VerificationCode,
};

/// Where the page is in the auth flow
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthStage {
    /// Login form (default)
    #[default]
    SignIn,
    /// Registration form, before a code has been sent
    Register,
    /// Waiting for the verification code sent to `email`
    AwaitingCode { email: String },
    /// A login or registration completed for `email`
    Authenticated { email: String },
}

/// What a submission does in a given stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionMode {
    /// Check credentials
    Login,
    /// Send a verification code
    BeginRegistration,
    /// Check the code and create the account
    Confirm,
}

impl AuthStage {
    /// Returns the submission mode for this stage
    pub fn mode(&self) -> SubmissionMode {
        match self {
            Self::Register => SubmissionMode::BeginRegistration,
            Self::AwaitingCode { .. } => SubmissionMode::Confirm,
            Self::SignIn | Self::Authenticated { .. } => SubmissionMode::Login,
        }
    }

    /// Returns the form title
    pub fn title(&self) -> &'static str {
        match self {
            Self::SignIn | Self::Authenticated { .. } => "Sign In to FILM07",
            Self::Register | Self::AwaitingCode { .. } => "Register a FILM07 Account",
        }
    }

    /// Returns the submit button label
    pub fn submit_label(&self) -> &'static str {
        match self.mode() {
            SubmissionMode::Login => "Sign In",
            SubmissionMode::BeginRegistration => "Register",
            SubmissionMode::Confirm => "Verify & Register",
        }
    }

    /// Returns true if the password field is shown
    pub fn shows_password(&self) -> bool {
        !self.shows_confirm_code()
    }

    /// Returns true if the confirmation code field is shown
    pub fn shows_confirm_code(&self) -> bool {
        matches!(self, Self::AwaitingCode { .. })
    }

    /// Returns true if the sign in / register switch is shown
    pub fn shows_mode_toggle(&self) -> bool {
        matches!(self, Self::SignIn | Self::Register)
    }
}

/// Values submitted from the auth form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    /// Email field
    pub email: String,
    /// Password field
    pub password: String,
    /// Confirmation code field, when shown
    pub confirm_code: Option<String>,
}

impl AuthForm {
    /// Creates a form with email and password
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirm_code: None,
        }
    }

    /// Sets the confirmation code
    pub fn with_confirm_code(mut self, code: impl Into<String>) -> Self {
        self.confirm_code = Some(code.into());
        self
    }
}

/// Style of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Success styling
    Success,
    /// Error styling
    Error,
}

impl StatusKind {
    /// Returns the style class added to the status area
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Text for the page's status area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Message text
    pub text: String,
    /// Message style
    pub kind: StatusKind,
}

impl StatusMessage {
    /// Creates a success message
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Success,
        }
    }

    /// Creates an error message
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }

    /// Returns true for error styling
    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

/// A successful flow step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowSuccess {
    /// A verification code was generated and "sent"
    CodeSent {
        email: String,
        code: VerificationCode,
    },
    /// The account was created and logged in
    Registered { user: UserRecord, redirect: Redirect },
    /// The credentials matched
    LoggedIn { user: UserRecord, redirect: Redirect },
}

impl FlowSuccess {
    /// Returns the text shown in the status area
    pub fn message(&self) -> String {
        match self {
            Self::CodeSent { email, code } => format!(
                "A 6-digit verification code has been \"sent\" to {email}. \
                 (Simulation: your code is {code})"
            ),
            Self::Registered { .. } => {
                "Registration successful! You will be redirected to the home page.".to_string()
            }
            Self::LoggedIn { .. } => {
                "Login successful! You will be redirected to the home page.".to_string()
            }
        }
    }

    /// Returns the redirect to schedule, if any
    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            Self::CodeSent { .. } => None,
            Self::Registered { redirect, .. } | Self::LoggedIn { redirect, .. } => Some(redirect),
        }
    }
}

/// Result of handling one form submission
#[derive(Debug)]
pub struct SubmitOutcome {
    /// Message for the status area
    pub status: StatusMessage,
    /// What happened
    pub result: AuthResult<FlowSuccess>,
}

impl SubmitOutcome {
    /// Returns the redirect to schedule, if any
    pub fn redirect(&self) -> Option<&Redirect> {
        self.result.as_ref().ok().and_then(FlowSuccess::redirect)
    }
}

/// Auth flow controller
#[derive(Debug)]
pub struct AuthFlow<S> {
    users: UserStore<S>,
    pending: PendingRegistrationStore<S>,
    config: FlowConfig,
    stage: AuthStage,
}

impl<S: KeyValueStore + Clone> AuthFlow<S> {
    /// Creates a controller in the sign in stage
    pub fn new(storage: S, config: FlowConfig) -> Self {
        Self {
            users: UserStore::new(storage.clone()),
            pending: PendingRegistrationStore::new(storage),
            config,
            stage: AuthStage::default(),
        }
    }
}

impl<S: KeyValueStore> AuthFlow<S> {
    /// Returns the current stage
    pub fn stage(&self) -> &AuthStage {
        &self.stage
    }

    /// Returns the user store
    pub fn users(&self) -> &UserStore<S> {
        &self.users
    }

    /// Returns the pending registration store
    pub fn pending(&self) -> &PendingRegistrationStore<S> {
        &self.pending
    }

    /// Switches between the sign in and register forms
    ///
    /// Has no effect while a code is awaited or after success.
    pub fn toggle_mode(&mut self) -> &AuthStage {
        self.stage = match &self.stage {
            AuthStage::SignIn => AuthStage::Register,
            AuthStage::Register => AuthStage::SignIn,
            other => other.clone(),
        };
        &self.stage
    }

    /// Handles a form submission in the current stage
    ///
    /// Never fails: every error becomes an error status message.
    pub fn submit(&mut self, form: &AuthForm) -> SubmitOutcome {
        let email = form.email.trim();

        let result = match self.stage.clone() {
            AuthStage::AwaitingCode {
                email: pending_email,
            } => {
                let code = form.confirm_code.as_deref().unwrap_or_default().trim();
                self.confirm_registration(&pending_email, code)
            }
            AuthStage::Register => self.begin_registration(email, &form.password),
            AuthStage::SignIn | AuthStage::Authenticated { .. } => {
                self.login(email, &form.password)
            }
        };

        let status = match &result {
            Ok(success) => StatusMessage::success(success.message()),
            Err(e) => {
                if e.is_storage_failure() {
                    tracing::error!(error = %e, "Submission failed on storage");
                }
                StatusMessage::error(e.user_message())
            }
        };
        SubmitOutcome { status, result }
    }

    /// Starts a registration by generating and storing a verification code
    ///
    /// A second call for the same email replaces the earlier code and draft.
    pub fn begin_registration(&mut self, email: &str, password: &str) -> AuthResult<FlowSuccess> {
        if self.users.contains(email) {
            tracing::warn!(email, "Registration rejected, email already registered");
            return Err(AuthError::DuplicateEmail(email.to_string()));
        }

        let code = VerificationCode::generate();
        let draft = RegistrationDraft::new(email, password);
        self.pending.put(&draft, &code)?;

        tracing::info!(email, "Verification code sent");
        self.stage = AuthStage::AwaitingCode {
            email: email.to_string(),
        };
        Ok(FlowSuccess::CodeSent {
            email: email.to_string(),
            code,
        })
    }

    /// Completes a registration if `submitted_code` matches the pending code
    ///
    /// A wrong code keeps the stage so the user can retry. When the pending
    /// registration can no longer complete, the stage falls back to the
    /// register form, or to sign in if the email got registered meanwhile.
    pub fn confirm_registration(
        &mut self,
        email: &str,
        submitted_code: &str,
    ) -> AuthResult<FlowSuccess> {
        if let Some(ttl) = self.config.pending_ttl_secs {
            if self.pending.remove_if_expired(email, ttl)? {
                tracing::warn!(email, "Pending registration expired");
                self.stage = AuthStage::Register;
                return Err(AuthError::PendingRegistrationExpired(email.to_string()));
            }
        }

        let code_matches = self
            .pending
            .code(email)?
            .is_some_and(|code| code.matches(submitted_code));
        if !code_matches {
            tracing::warn!(email, "Verification code rejected");
            return Err(AuthError::InvalidCode);
        }

        let Some(draft) = self.pending.draft(email)? else {
            tracing::warn!(email, "Pending registration has no draft");
            self.abandon_pending(email, AuthStage::Register);
            return Err(AuthError::MissingPendingRegistration(email.to_string()));
        };

        let mut users = self.users.load_users();
        if users.iter().any(|u| u.email == draft.email) {
            tracing::warn!(email, "Registration rejected, email registered meanwhile");
            self.abandon_pending(email, AuthStage::SignIn);
            return Err(AuthError::DuplicateEmail(draft.email));
        }

        for user in &mut users {
            user.is_logged_in = false;
        }
        let user = draft.into_user();
        users.push(user.clone());
        self.users.save_users(&users)?;

        // The account exists now; a leftover pending entry only wastes space
        if let Err(e) = self.pending.clear(email) {
            tracing::warn!(email, error = %e, "Failed to clear pending registration");
        }

        tracing::info!(email = %user.email, "Registration completed");
        self.stage = AuthStage::Authenticated {
            email: user.email.clone(),
        };
        Ok(FlowSuccess::Registered {
            user,
            redirect: self.redirect(),
        })
    }

    /// Logs in by exact email and password match
    ///
    /// On success the matched account becomes the only logged in one.
    pub fn login(&mut self, email: &str, password: &str) -> AuthResult<FlowSuccess> {
        let mut users = self.users.load_users();
        if !users.iter().any(|u| u.matches(email, password)) {
            tracing::warn!(email, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        for user in &mut users {
            user.is_logged_in = user.email == email;
        }
        self.users.save_users(&users)?;

        let user = UserRecord::new(email, password).logged_in(true);
        tracing::info!(email, "Login succeeded");
        self.stage = AuthStage::Authenticated {
            email: email.to_string(),
        };
        Ok(FlowSuccess::LoggedIn {
            user,
            redirect: self.redirect(),
        })
    }

    fn abandon_pending(&mut self, email: &str, stage: AuthStage) {
        if let Err(e) = self.pending.clear(email) {
            tracing::warn!(email, error = %e, "Failed to clear pending registration");
        }
        self.stage = stage;
    }

    fn redirect(&self) -> Redirect {
        Redirect::new(self.config.landing_page.clone(), self.config.redirect_delay)
    }
}
