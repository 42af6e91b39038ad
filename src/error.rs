use thiserror::Error;

/// Errors raised by the stores, the session and the command surfaces.
///
/// The projector itself never fails; everything here comes from parsing user
/// input or from talking to a collaborator.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not signed in\n  hint: run 'cosmic login <email>' first")]
    NotSignedIn,

    #[error("invalid e-mail address: '{0}'")]
    InvalidEmail(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    #[error("a daily focus already exists for {0}\n  hint: use 'cosmic focus edit' to change it")]
    DuplicateFocus(chrono::NaiveDate),

    #[error("no daily focus set for {0}\n  hint: use 'cosmic focus set <title>' first")]
    NoFocus(chrono::NaiveDate),

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("invalid priority: '{0}'\n  hint: valid priorities are: low, medium, high")]
    InvalidPriority(String),

    #[error("invalid status: '{0}'\n  hint: valid statuses are: draft, published, archived")]
    InvalidStatus(String),

    #[error("invalid category: '{0}'\n  hint: valid categories are: general, work, personal, learning, reference, ideas, projects")]
    InvalidCategory(String),

    #[error("invalid visibility: '{0}'\n  hint: valid values are: all, public, private")]
    InvalidVisibility(String),

    #[error("invalid date '{0}'\n  hint: use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid rating {0}: must be between 1 and 5")]
    InvalidRating(u8),

    #[error("invalid backend: '{0}'\n  hint: valid backends are: json, fixture")]
    InvalidBackend(String),

    #[error("unsupported shell: '{0}'")]
    UnsupportedShell(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt data: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
