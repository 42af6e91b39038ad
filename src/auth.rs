//! Who is using the application.
//!
//! Real authentication is someone else's job; this module only keeps track
//! of the signed-in identity so every fetch can be scoped to it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::{BackendKind, Config};
use crate::error::{Error, Result};
use crate::models::UserId;

const SESSION_FILE_NAME: &str = "session.json";

/// The signed-in user.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
}

impl User {
    /// Builds a user whose id is the normalised e-mail address, so distinct
    /// addresses never share an id.
    pub fn from_email(email: &str, full_name: Option<String>) -> Self {
        let email = email.trim().to_lowercase();
        User {
            id: UserId(format!("user-{email}")),
            email,
            full_name: full_name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        }
    }

    /// Full name, else the local part of the e-mail, else "Astronaut".
    pub fn display_name(&self) -> &str {
        if let Some(name) = &self.full_name {
            return name;
        }
        match self.email.split('@').next() {
            Some(local) if !local.is_empty() => local,
            _ => "Astronaut",
        }
    }

    /// Up to two upper-case initials of the display name.
    pub fn initials(&self) -> String {
        self.display_name()
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

/// The user the demo backend belongs to.
pub fn demo_user() -> User {
    User {
        id: UserId::new("demo-user-id"),
        email: "demo@cosmictasks.app".to_string(),
        full_name: Some("Demo Astronaut".to_string()),
    }
}

/// Session collaborator.
pub trait Authenticator {
    /// `None` when nobody is signed in.
    fn current_user(&self) -> Result<Option<User>>;
    fn sign_in(&mut self, email: &str, full_name: Option<String>) -> Result<User>;
    fn sign_out(&mut self) -> Result<()>;

    /// The signed-in user, or [`Error::NotSignedIn`].
    fn require_user(&self) -> Result<User> {
        self.current_user()?.ok_or(Error::NotSignedIn)
    }
}

/// Keeps the signed-in user in `session.json` in the data directory.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        SessionFile { path: data_dir.as_ref().join(SESSION_FILE_NAME) }
    }
}

impl Authenticator for SessionFile {
    fn current_user(&self) -> Result<Option<User>> {
        match fs::read_to_string(&self.path) {
            Ok(s) => Ok(Some(serde_json::from_str(&s)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn sign_in(&mut self, email: &str, full_name: Option<String>) -> Result<User> {
        if !email.contains('@') {
            return Err(Error::InvalidEmail(email.to_string()));
        }
        let mut user = User::from_email(email, full_name);
        // keep a previously given name when signing in again without one
        if user.full_name.is_none() {
            if let Some(previous) = self.current_user()?.filter(|u| u.id == user.id) {
                user.full_name = previous.full_name;
            }
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&user)?)?;
        tracing::info!(user = %user.id, "signed in");
        Ok(user)
    }

    fn sign_out(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("signed out");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Always signed in as [`demo_user`]. Sign-in and sign-out are accepted and
/// ignored.
#[derive(Debug, Clone, Default)]
pub struct FixtureAuth;

impl Authenticator for FixtureAuth {
    fn current_user(&self) -> Result<Option<User>> {
        Ok(Some(demo_user()))
    }

    fn sign_in(&mut self, _email: &str, _full_name: Option<String>) -> Result<User> {
        Ok(demo_user())
    }

    fn sign_out(&mut self) -> Result<()> {
        Ok(())
    }
}

/// The authenticator matching `config.backend`.
pub fn open_authenticator(config: &Config) -> Box<dyn Authenticator> {
    match config.backend {
        BackendKind::Json => Box::new(SessionFile::new(&config.data_dir)),
        BackendKind::Fixture => Box::new(FixtureAuth),
    }
}
