//! Terminal rendering of the auth page.
//!
//! The page holds the form field values and the last status message, and
//! renders whatever the controller's stage says is visible.

use auth::{
    AuthFlow, AuthForm, FlowConfig, FlowSuccess, Navigator, Redirect, StatusMessage,
    SubmissionMode, ThemeStore,
};
use storage::KeyValueStore;
use tokio::sync::mpsc;

/// A line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set the email field
    Email(String),
    /// Set the password field
    Password(String),
    /// Set the confirmation code field
    Code(String),
    /// Submit the form
    Submit,
    /// Switch between sign in and register
    Toggle,
    /// Switch between light and dark
    Theme,
    /// Print the page again
    Show,
    /// Print the command list
    Help,
    /// Leave
    Quit,
    /// Anything else
    Unknown(String),
}

impl Command {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }

        let (word, rest) = match line.trim_start().split_once(' ') {
            Some((word, rest)) => (word, rest),
            None => (line.trim(), ""),
        };

        Some(match word {
            "email" => Self::Email(rest.to_string()),
            // Passwords are taken verbatim, surrounding spaces included
            "password" => Self::Password(rest.to_string()),
            "code" => Self::Code(rest.to_string()),
            "submit" => Self::Submit,
            "toggle" => Self::Toggle,
            "theme" => Self::Theme,
            "show" => Self::Show,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        })
    }
}

/// What the terminal should do after a command
#[derive(Debug, Default)]
pub struct PageResponse {
    /// Lines to print
    pub lines: Vec<String>,
    /// Redirect to schedule
    pub redirect: Option<Redirect>,
    /// Stop reading input
    pub quit: bool,
}

impl PageResponse {
    fn lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            ..Self::default()
        }
    }
}

const HELP: &[&str] = &[
    "Commands:",
    "  email <address>    fill in the email field",
    "  password <text>    fill in the password field",
    "  code <digits>      fill in the confirmation code field",
    "  submit             submit the form",
    "  toggle             switch between sign in and register",
    "  theme              switch between light and dark mode",
    "  show               print the page",
    "  quit               leave",
];

/// The auth page
#[derive(Debug)]
pub struct ConsolePage<S> {
    flow: AuthFlow<S>,
    theme: ThemeStore<S>,
    form: AuthForm,
    status: Option<StatusMessage>,
}

impl<S: KeyValueStore + Clone> ConsolePage<S> {
    /// Creates the page over a storage backend
    pub fn new(storage: S, config: FlowConfig) -> Self {
        Self {
            flow: AuthFlow::new(storage.clone(), config),
            theme: ThemeStore::new(storage),
            form: AuthForm::default(),
            status: None,
        }
    }
}

impl<S: KeyValueStore> ConsolePage<S> {
    /// Returns the controller
    pub fn flow(&self) -> &AuthFlow<S> {
        &self.flow
    }

    /// Returns the current status message
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Renders the visible parts of the page
    pub fn render(&self) -> Vec<String> {
        let stage = self.flow.stage();
        let mut lines = vec![
            format!("== {} ==   [{}]", stage.title(), self.theme.load().label()),
            format!("Email: {}", self.form.email),
        ];

        if stage.shows_password() {
            let masked = "*".repeat(self.form.password.chars().count());
            lines.push(format!("Password: {masked}"));
        }
        if stage.shows_confirm_code() {
            lines.push(format!(
                "Confirmation code: {}",
                self.form.confirm_code.as_deref().unwrap_or_default()
            ));
        }
        lines.push(format!("[ {} ]", stage.submit_label()));

        if stage.shows_mode_toggle() {
            let hint = match stage.mode() {
                SubmissionMode::BeginRegistration => {
                    "Already have an account? Type `toggle` to sign in."
                }
                _ => "No account yet? Type `toggle` to register.",
            };
            lines.push(hint.to_string());
        }
        if let Some(status) = &self.status {
            lines.push(format!("({}) {}", status.kind.css_class(), status.text));
        }
        lines
    }

    /// Applies one command
    pub fn handle(&mut self, command: Command) -> PageResponse {
        match command {
            Command::Email(email) => self.form.email = email,
            Command::Password(password) => self.form.password = password,
            Command::Code(code) => self.form.confirm_code = Some(code),
            Command::Toggle => {
                self.flow.toggle_mode();
                self.status = None;
            }
            Command::Theme => {
                if let Err(e) = self.theme.toggle() {
                    self.status = Some(StatusMessage::error(e.user_message()));
                }
            }
            Command::Submit => return self.submit(),
            Command::Show => {}
            Command::Help => {
                return PageResponse::lines(HELP.iter().map(|l| l.to_string()).collect());
            }
            Command::Quit => {
                return PageResponse {
                    quit: true,
                    ..PageResponse::default()
                };
            }
            Command::Unknown(word) => {
                return PageResponse::lines(vec![format!(
                    "Unknown command `{word}`. Type `help` for a list."
                )]);
            }
        }
        PageResponse::lines(self.render())
    }

    fn submit(&mut self) -> PageResponse {
        self.status = None;
        let outcome = self.flow.submit(&self.form);
        let redirect = outcome.redirect().cloned();

        if let Ok(FlowSuccess::CodeSent { .. }) = &outcome.result {
            self.form.password.clear();
        }
        self.status = Some(outcome.status);

        PageResponse {
            lines: self.render(),
            redirect,
            quit: false,
        }
    }
}

/// Navigator that hands the target to the input loop
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    /// Creates a navigator and the receiver the loop listens on
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, target: &str) {
        if self.tx.send(target.to_string()).is_err() {
            tracing::debug!(to = target, "Page closed before redirect");
        }
    }
}
