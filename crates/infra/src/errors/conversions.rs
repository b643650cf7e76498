//! Conversions from external infrastructure errors into domain errors.

use mailparse::MailParseError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use staysync_domain::StaySyncError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub StaySyncError);

impl From<InfraError> for StaySyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<StaySyncError> for InfraError {
    fn from(value: StaySyncError) -> Self {
        InfraError(value)
    }
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → StaySyncError */
/* -------------------------------------------------------------------------- */

impl From<SqlError> for InfraError {
    fn from(err: SqlError) -> Self {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        let domain_err = match err {
            RE::SqliteFailure(inner, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match inner.code {
                    ErrorCode::DatabaseBusy => StaySyncError::Database("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        StaySyncError::Database("database is locked".into())
                    }
                    ErrorCode::ConstraintViolation => StaySyncError::Database(format!(
                        "constraint violation (code {}): {message}",
                        inner.extended_code
                    )),
                    _ => StaySyncError::Database(format!(
                        "sqlite failure {:?} (code {}): {message}",
                        inner.code, inner.extended_code
                    )),
                }
            }
            RE::QueryReturnedNoRows => {
                StaySyncError::NotFound("no rows returned by query".into())
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                StaySyncError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                StaySyncError::Database(format!("invalid column type: {ty}"))
            }
            other => StaySyncError::Database(other.to_string()),
        };

        InfraError(domain_err)
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(err: r2d2::Error) -> Self {
        InfraError(StaySyncError::Database(format!("connection pool error: {err}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → StaySyncError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for InfraError {
    fn from(err: HttpError) -> Self {
        let message = if err.is_timeout() {
            format!("http request timed out: {err}")
        } else if err.is_connect() {
            format!("http connection failed: {err}")
        } else {
            format!("http error: {err}")
        };
        InfraError(StaySyncError::Network(message))
    }
}

/* -------------------------------------------------------------------------- */
/* imap / mailparse errors → StaySyncError */
/* -------------------------------------------------------------------------- */

impl From<imap::Error> for InfraError {
    fn from(err: imap::Error) -> Self {
        InfraError(StaySyncError::Mailbox(format!("imap error: {err}")))
    }
}

impl From<MailParseError> for InfraError {
    fn from(err: MailParseError) -> Self {
        InfraError(StaySyncError::Mailbox(format!("message decode failed: {err}")))
    }
}
