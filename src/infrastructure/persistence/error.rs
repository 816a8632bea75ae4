use crate::domain::errors::DomainError;

// SQLite extended result codes.
const SQLITE_CONSTRAINT_CHECK: &str = "275";
const SQLITE_CONSTRAINT_FOREIGNKEY: &str = "787";
const SQLITE_CONSTRAINT_NOTNULL: &str = "1299";
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";

pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message();
            match db_err.code().as_deref() {
                Some(SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY) => {
                    DomainError::Conflict(unique_violation(message))
                }
                Some(SQLITE_CONSTRAINT_FOREIGNKEY) => {
                    DomainError::NotFound("referenced record not found".into())
                }
                Some(SQLITE_CONSTRAINT_CHECK | SQLITE_CONSTRAINT_NOTNULL) => {
                    DomainError::Validation(format!("constraint violated: {message}"))
                }
                _ => DomainError::Persistence(message.to_string()),
            }
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            DomainError::Persistence(format!("failed to decode row: {err}"))
        }
        _ => DomainError::Persistence(err.to_string()),
    }
}

fn unique_violation(message: &str) -> String {
    if message.contains("accounts.username") {
        "username already exists".into()
    } else if message.contains("accounts.email") {
        "email already exists".into()
    } else if message.contains("roles.title") {
        "role title already exists".into()
    } else {
        "unique constraint violated".into()
    }
}
