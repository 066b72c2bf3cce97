use crate::errors::{AccountError, Result};
use crate::models::{Account, NewAccount, UserId};
use crate::schema::users::dsl::{self, users};
use diesel::prelude::*;

fn require_credentials(name: &str, password: &str) -> Result<()> {
    if name.is_empty() || password.is_empty() {
        return Err(AccountError::MissingCredentials);
    }
    Ok(())
}

pub fn is_registered(conn: &mut SqliteConnection, name: &str) -> Result<bool> {
    let count: i64 = users
        .filter(dsl::name.eq(name))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Creates an account. The password is stored as given.
pub fn register(conn: &mut SqliteConnection, name: &str, password: &str) -> Result<()> {
    require_credentials(name, password)?;

    if is_registered(conn, name)? {
        return Err(AccountError::AlreadyRegistered);
    }

    // A concurrent registration can still win between the check and the
    // insert; the UNIQUE constraint on users.name turns that into a conflict.
    diesel::insert_into(users)
        .values(&NewAccount { name, password })
        .execute(conn)
        .map_err(AccountError::from_account_insert)?;

    Ok(())
}

pub fn verify(conn: &mut SqliteConnection, name: &str, password: &str) -> Result<UserId> {
    require_credentials(name, password)?;

    let account = users
        .filter(dsl::name.eq(name))
        .select(Account::as_select())
        .first(conn)
        .optional()?
        .ok_or(AccountError::NotRegistered)?;

    if account.password.as_bytes() != password.as_bytes() {
        return Err(AccountError::InvalidPassword);
    }
    Ok(account.user_id)
}
