use chrono::{Local, NaiveDate};

use crate::auth::{open_authenticator, Authenticator, User};
use crate::config::Config;
use crate::error::Result;
use crate::store::{open_backend, Backend};

/// Collaborators every command and the dashboard work against.
pub struct Context {
    pub store: Box<dyn Backend>,
    pub auth: Box<dyn Authenticator>,
    /// The calendar day "today" refers to.
    pub today: NaiveDate,
}

impl Context {
    pub fn new(store: Box<dyn Backend>, auth: Box<dyn Authenticator>, today: NaiveDate) -> Self {
        Context { store, auth, today }
    }

    /// Opens the backend and session selected by `config`, dated to the local day.
    pub fn open(config: &Config) -> Result<Self> {
        let today = Local::now().date_naive();
        Ok(Context::new(open_backend(config, today)?, open_authenticator(config), today))
    }

    pub fn user(&self) -> Result<User> {
        self.auth.require_user()
    }
}
