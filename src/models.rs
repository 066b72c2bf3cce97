use crate::schema::{sessions, users};
use diesel::prelude::*;

pub type UserId = i32;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Account {
    pub user_id: UserId,
    pub name: String,
    pub password: String,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewAccount<'a> {
    pub name: &'a str,
    pub password: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = sessions)]
pub struct NewSession<'a> {
    pub user_id: UserId,
    pub token: &'a str,
}

/// What the owner of a session token gets to see about their account.
#[derive(Queryable, Debug, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub password: String,
}
