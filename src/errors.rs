use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("You MUST provide name AND password")]
    MissingCredentials,

    #[error("You are already registered")]
    AlreadyRegistered,

    #[error("You are not registered")]
    NotRegistered,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Cookie with access token must be supplied")]
    MissingToken,

    #[error("Token is malformed")]
    MalformedToken,

    #[error("Invalid session token")]
    InvalidToken,

    #[error("database error: {0}")]
    Database(#[from] DieselError),

    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("random source unavailable: {0}")]
    Entropy(#[from] rand::Error),

    #[error("blocking task failed: {0}")]
    Blocking(#[from] BlockingError),
}

impl AccountError {
    /// Storage-class failures are logged server-side and never shown to the caller.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            AccountError::Database(_)
                | AccountError::Pool(_)
                | AccountError::Entropy(_)
                | AccountError::Blocking(_)
        )
    }

    /// Maps an insert failure onto the registration taxonomy: losing the
    /// unique-name race is a conflict, anything else stays a storage error.
    pub fn from_account_insert(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                AccountError::AlreadyRegistered
            }
            other => AccountError::Database(other),
        }
    }
}

impl ResponseError for AccountError {
    fn status_code(&self) -> StatusCode {
        match self {
            AccountError::MissingCredentials => StatusCode::UNPROCESSABLE_ENTITY,
            AccountError::AlreadyRegistered => StatusCode::UNPROCESSABLE_ENTITY,
            AccountError::InvalidPassword => StatusCode::UNPROCESSABLE_ENTITY,
            AccountError::NotRegistered => StatusCode::UNAUTHORIZED,
            AccountError::MissingToken => StatusCode::UNAUTHORIZED,
            AccountError::MalformedToken => StatusCode::UNAUTHORIZED,
            AccountError::InvalidToken => StatusCode::UNAUTHORIZED,
            AccountError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AccountError::Pool(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AccountError::Entropy(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AccountError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if self.is_storage() {
            log::error!("Request failed: {}", self);
            return HttpResponse::build(status).finish();
        }

        HttpResponse::build(status)
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AccountError>;
