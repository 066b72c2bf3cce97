use crate::errors::{AccountError, Result};
use crate::models::Profile;
use crate::schema::{sessions, users};
use crate::services::Token;
use diesel::prelude::*;

pub fn get_profile(conn: &mut SqliteConnection, token: &Token) -> Result<Profile> {
    sessions::table
        .inner_join(users::table)
        .filter(sessions::token.eq(token.as_str()))
        .select((users::name, users::password))
        .first::<Profile>(conn)
        .optional()?
        .ok_or(AccountError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::services::{credentials, sessions as session_service};

    #[test]
    fn profile_belongs_to_the_token_owner() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();

        credentials::register(&mut conn, "alice", "secret").unwrap();
        credentials::register(&mut conn, "bob", "hunter2").unwrap();
        let alice = credentials::verify(&mut conn, "alice", "secret").unwrap();
        let bob = credentials::verify(&mut conn, "bob", "hunter2").unwrap();
        let alice_token = session_service::issue(&mut conn, alice).unwrap();
        let bob_token = session_service::issue(&mut conn, bob).unwrap();

        assert_eq!(
            get_profile(&mut conn, &alice_token).unwrap(),
            Profile {
                name: "alice".into(),
                password: "secret".into(),
            }
        );
        assert_eq!(get_profile(&mut conn, &bob_token).unwrap().name, "bob");
    }

    #[test]
    fn unknown_or_revoked_token_has_no_profile() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();

        credentials::register(&mut conn, "alice", "secret").unwrap();
        let alice = credentials::verify(&mut conn, "alice", "secret").unwrap();
        let token = session_service::issue(&mut conn, alice).unwrap();
        session_service::revoke(&mut conn, &token).unwrap();

        assert!(matches!(
            get_profile(&mut conn, &token),
            Err(AccountError::InvalidToken)
        ));
        assert!(matches!(
            get_profile(&mut conn, &Token::generate().unwrap()),
            Err(AccountError::InvalidToken)
        ));
    }
}
