use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::auth::{AuthError, LoginOutcome};
use crate::api::ApiClient;
use crate::mac::{self, DisplayRow, LookupError, MacLookup};
use crate::ui::login::{LoginAction, LoginScreen};
use crate::ui::query::{QueryAction, QueryScreen};
use crate::ui::signup::{SignupAction, SignupScreen};
use crate::ui::twofactor::{TwoFactorAction, TwoFactorScreen};
use crate::ui::{self, FormStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    SignUp,
    Login,
    TwoFactor,
    Query,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    fn lifetime(self) -> Duration {
        match self {
            // Advisory lists linger long enough to read through; errors
            // and successes expire like toasts.
            Severity::Info => Duration::from_secs(300),
            Severity::Success | Severity::Error => Duration::from_secs(3),
        }
    }
}

#[derive(Debug)]
pub struct Notice {
    pub severity: Severity,
    pub text: String,
    expires_at: Instant,
}

/// Results of spawned async work, delivered back to the event loop.
#[derive(Debug)]
pub enum AppMessage {
    SignupFinished(Result<(), AuthError>),
    LoginFinished(Result<LoginOutcome, AuthError>),
    VerifyFinished(Result<(), AuthError>),
    /// Tagged with the generation of the submission that started it.
    LookupFinished(u64, Result<Vec<DisplayRow>, LookupError>),
}

pub struct App {
    pub screen: Screen,
    pub signup: SignupScreen,
    pub login: LoginScreen,
    pub twofactor: TwoFactorScreen,
    pub query: QueryScreen,
    pub notices: Vec<Notice>,
    client: Arc<ApiClient>,
    lookup: Arc<dyn MacLookup>,
    /// Bumped on every submission and on logout; lookup results carrying
    /// an older generation are dropped.
    lookup_generation: u64,
    username: Option<String>,
    default_validate: bool,
    tx: mpsc::UnboundedSender<AppMessage>,
    rx: mpsc::UnboundedReceiver<AppMessage>,
    should_quit: bool,
}

impl App {
    pub fn new(client: Arc<ApiClient>, validate_format: bool) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            screen: Screen::SignUp,
            signup: SignupScreen::new(),
            login: LoginScreen::new(),
            twofactor: TwoFactorScreen::new(None),
            query: QueryScreen::new(validate_format),
            notices: Vec::new(),
            lookup: client.clone(),
            client,
            lookup_generation: 0,
            username: None,
            default_validate: validate_format,
            tx,
            rx,
            should_quit: false,
        }
    }

    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;

            while let Ok(message) = self.rx.try_recv() {
                self.on_message(message);
            }
            self.prune_notices(Instant::now());

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.on_key(key);
                    }
                }
            }
        }
        Ok(())
    }

    fn on_key(&mut self, key: KeyEvent) {
        match self.screen {
            Screen::SignUp => match self.signup.handle_key(key) {
                SignupAction::Submit => self.submit_signup(),
                SignupAction::SwitchToLogin => self.screen = Screen::Login,
                SignupAction::Quit => self.should_quit = true,
                SignupAction::None => {}
            },
            Screen::Login => match self.login.handle_key(key) {
                LoginAction::Submit => self.submit_login(),
                LoginAction::SwitchToSignup => self.screen = Screen::SignUp,
                LoginAction::Quit => self.should_quit = true,
                LoginAction::None => {}
            },
            Screen::TwoFactor => match self.twofactor.handle_key(key) {
                TwoFactorAction::Submit => self.submit_verify(),
                TwoFactorAction::OpenQr => self.open_qr(),
                TwoFactorAction::Quit => self.should_quit = true,
                TwoFactorAction::None => {}
            },
            Screen::Query => match self.query.handle_key(key) {
                QueryAction::Submit => self.submit_lookup(),
                QueryAction::Logout => self.logout(),
                QueryAction::Quit => self.should_quit = true,
                QueryAction::None => {}
            },
        }
    }

    fn submit_signup(&mut self) {
        self.signup.status = FormStatus::Busy;
        let client = self.client.clone();
        let tx = self.tx.clone();
        let username = self.signup.username.clone();
        let password = self.signup.password.clone();

        info!(username = %username, "signing up");
        tokio::spawn(async move {
            let result = client.signup(&username, &password).await;
            let _ = tx.send(AppMessage::SignupFinished(result));
        });
    }

    fn submit_login(&mut self) {
        self.login.status = FormStatus::Busy;
        let client = self.client.clone();
        let tx = self.tx.clone();
        let username = self.login.username.clone();
        let password = self.login.password.clone();

        info!(username = %username, "logging in");
        tokio::spawn(async move {
            let result = client.authenticate(&username, &password).await;
            let _ = tx.send(AppMessage::LoginFinished(result));
        });
    }

    fn submit_verify(&mut self) {
        let Some(username) = self.username.clone() else {
            // A code cannot be checked without knowing whose it is.
            warn!("2FA submit without a logged-in username");
            self.twofactor.status = FormStatus::Failure;
            self.notify(Severity::Error, "Incorrect 2FA code.");
            return;
        };

        self.twofactor.status = FormStatus::Busy;
        let client = self.client.clone();
        let tx = self.tx.clone();
        let token = self.twofactor.token.clone();

        info!(username = %username, "verifying 2FA code");
        tokio::spawn(async move {
            let result = client.verify(&username, &token).await;
            let _ = tx.send(AppMessage::VerifyFinished(result));
        });
    }

    fn submit_lookup(&mut self) {
        if self.query.busy {
            // One outstanding request at a time; extra submits are dropped.
            debug!("lookup already in flight, ignoring submit");
            return;
        }

        let candidates = match mac::parse_search_input(&self.query.input) {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(error = %err, "rejected search input");
                self.notify(Severity::Error, err.to_string());
                return;
            }
        };

        if self.query.validate_format {
            let advisories = mac::format_advisories(&candidates);
            if !advisories.is_empty() {
                info!(count = advisories.len(), "format advisories for batch");
                self.notify(Severity::Info, advisories.join("\n"));
            }
        }

        info!(count = candidates.len(), "submitting MAC batch");
        self.query.busy = true;
        self.lookup_generation += 1;
        let generation = self.lookup_generation;
        let lookup = self.lookup.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = lookup.check(&candidates).await;
            let _ = tx.send(AppMessage::LookupFinished(generation, result));
        });
    }

    fn on_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::SignupFinished(Ok(())) => {
                info!("signup succeeded");
                self.signup = SignupScreen::new();
                self.screen = Screen::Login;
            }
            AppMessage::SignupFinished(Err(err)) => {
                warn!(
                    cause = err.cause().unwrap_or("rejected by service"),
                    "signup failed"
                );
                self.signup.status = FormStatus::Failure;
            }
            AppMessage::LoginFinished(Ok(outcome)) => {
                self.username = Some(self.login.username.clone());
                self.login = LoginScreen::new();
                if outcome.otp_required {
                    info!("login ok, 2FA required");
                    self.notify(Severity::Success, "Logging in Successful");
                    self.twofactor = TwoFactorScreen::new(outcome.qr_code);
                    self.screen = Screen::TwoFactor;
                } else {
                    info!("login ok");
                    self.enter_dashboard();
                }
            }
            AppMessage::LoginFinished(Err(err)) => {
                warn!(cause = err.cause().unwrap_or("unknown"), "login failed");
                self.login.status = FormStatus::Failure;
                self.notify(Severity::Error, err.to_string());
            }
            AppMessage::VerifyFinished(Ok(())) => {
                info!("2FA verified");
                self.twofactor = TwoFactorScreen::new(None);
                self.enter_dashboard();
            }
            AppMessage::VerifyFinished(Err(err)) => {
                warn!(
                    cause = err.cause().unwrap_or("rejected by service"),
                    "2FA verify failed"
                );
                self.twofactor.status = FormStatus::Failure;
                self.notify(Severity::Error, err.to_string());
            }
            AppMessage::LookupFinished(generation, result) => {
                if generation != self.lookup_generation {
                    // The session that submitted it is gone.
                    debug!(generation, "dropping stale lookup result");
                    return;
                }
                match result {
                    Ok(rows) => {
                        info!(count = rows.len(), "lookup finished");
                        self.query.busy = false;
                        self.query.set_rows(rows);
                        self.notify(Severity::Success, "Search completed");
                    }
                    Err(err) => {
                        error!(
                            error = %err,
                            cause = err.cause().unwrap_or(""),
                            "lookup failed"
                        );
                        self.query.busy = false;
                        self.query.set_error(err.to_string());
                        self.notify(Severity::Error, err.to_string());
                    }
                }
            }
        }
    }

    fn enter_dashboard(&mut self) {
        self.query = QueryScreen::new(self.default_validate);
        self.screen = Screen::Query;
    }

    fn logout(&mut self) {
        info!("logged out");
        // A lookup still in flight now answers a dead session.
        self.lookup_generation += 1;
        self.username = None;
        self.login = LoginScreen::new();
        self.twofactor = TwoFactorScreen::new(None);
        self.query = QueryScreen::new(self.default_validate);
        self.screen = Screen::Login;
    }

    fn open_qr(&mut self) {
        let Some(ref qr) = self.twofactor.qr_code else {
            return;
        };
        if let Err(err) = open::that_detached(qr) {
            warn!(error = %err, "failed to hand QR code to the browser");
            self.notify(Severity::Error, "Could not open the QR code in a browser.");
        }
    }

    pub fn notify(&mut self, severity: Severity, text: impl Into<String>) {
        self.notices.push(Notice {
            severity,
            text: text.into(),
            expires_at: Instant::now() + severity.lifetime(),
        });
    }

    fn prune_notices(&mut self, now: Instant) {
        self.notices.retain(|notice| notice.expires_at > now);
    }
}
