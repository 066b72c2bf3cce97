use std::fmt;
use std::str::FromStr;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::errors::{AccountError, Result};
use crate::models::{NewSession, UserId};
use crate::schema::sessions::dsl::{self, sessions};
use diesel::prelude::*;

const TOKEN_BYTES: usize = 32;
pub const TOKEN_LEN: usize = TOKEN_BYTES * 2;

/// A session token: 32 random bytes as 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    /// Reads from the operating system's CSPRNG. If that source fails there
    /// is no fallback; the error is returned.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.try_fill_bytes(&mut bytes)?;
        Ok(Token(hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Token {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self> {
        let well_formed = s.len() == TOKEN_LEN
            && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if !well_formed {
            return Err(AccountError::MalformedToken);
        }
        Ok(Token(s.to_owned()))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn issue(conn: &mut SqliteConnection, user_id: UserId) -> Result<Token> {
    let token = Token::generate()?;
    diesel::insert_into(sessions)
        .values(&NewSession {
            user_id,
            token: token.as_str(),
        })
        .execute(conn)?;
    Ok(token)
}

/// Removes the session if there is one. Unknown tokens are not an error.
pub fn revoke(conn: &mut SqliteConnection, token: &Token) -> Result<()> {
    let removed = diesel::delete(sessions.filter(dsl::token.eq(token.as_str()))).execute(conn)?;
    log::debug!("Revoked {} session(s)", removed);
    Ok(())
}

pub fn resolve_user(conn: &mut SqliteConnection, token: &Token) -> Result<UserId> {
    sessions
        .filter(dsl::token.eq(token.as_str()))
        .select(dsl::user_id)
        .first::<UserId>(conn)
        .optional()?
        .ok_or(AccountError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::services::credentials;
    use std::collections::HashSet;

    #[test]
    fn generated_tokens_are_lowercase_hex() {
        let mut seen = HashSet::new();
        for _ in 0..64 {
            let token = Token::generate().unwrap();
            assert_eq!(token.as_str().len(), TOKEN_LEN);
            assert!(token
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
            assert!(token.as_str().parse::<Token>().is_ok());
            assert!(seen.insert(token));
        }
    }

    #[test]
    fn parsing_rejects_malformed_tokens() {
        let upper = "A".repeat(TOKEN_LEN);
        let short = "a".repeat(TOKEN_LEN - 1);
        let long = "a".repeat(TOKEN_LEN + 1);
        let not_hex = "g".repeat(TOKEN_LEN);
        for bad in ["", short.as_str(), long.as_str(), upper.as_str(), not_hex.as_str()] {
            assert!(matches!(bad.parse::<Token>(), Err(AccountError::MalformedToken)));
        }
    }

    #[test]
    fn issued_token_resolves_until_revoked() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();

        credentials::register(&mut conn, "alice", "secret").unwrap();
        let user = credentials::verify(&mut conn, "alice", "secret").unwrap();

        let first = issue(&mut conn, user).unwrap();
        let second = issue(&mut conn, user).unwrap();
        assert_ne!(first, second);
        assert_eq!(resolve_user(&mut conn, &first).unwrap(), user);
        assert_eq!(resolve_user(&mut conn, &second).unwrap(), user);

        revoke(&mut conn, &first).unwrap();
        assert!(matches!(
            resolve_user(&mut conn, &first),
            Err(AccountError::InvalidToken)
        ));
        assert_eq!(resolve_user(&mut conn, &second).unwrap(), user);
    }

    #[test]
    fn revoking_unknown_token_is_fine() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();

        let token = Token::generate().unwrap();
        revoke(&mut conn, &token).unwrap();
        revoke(&mut conn, &token).unwrap();
    }

    #[test]
    fn sessions_must_reference_an_account() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();

        assert!(matches!(issue(&mut conn, 42), Err(AccountError::Database(_))));
    }
}
