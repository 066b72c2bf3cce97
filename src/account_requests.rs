use std::future::{ready, Ready};

use actix_web::cookie::Cookie;
use actix_web::dev::Payload;
use actix_web::http::Method;
use actix_web::web::{self, block, Data, Form, FormConfig, ServiceConfig};
use actix_web::{get, post, FromRequest, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::db::DbPool;
use crate::errors::{AccountError, Result};
use crate::services::{credentials, profile, sessions, Token};

pub const SESSION_COOKIE: &str = "sessionToken";

/// Missing fields decode as empty strings so they are reported as
/// `MissingCredentials` rather than as a form parse failure.
#[derive(Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    password: String,
}

impl FromRequest for Token {
    type Error = AccountError;
    type Future = Ready<Result<Self>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.cookie(SESSION_COOKIE)
                .ok_or(AccountError::MissingToken)
                .and_then(|cookie| cookie.value().parse()),
        )
    }
}

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.app_data(
        FormConfig::default().error_handler(|err, _req| {
            log::debug!("Rejected form body: {}", err);
            AccountError::MissingCredentials.into()
        }),
    )
    .service(register)
    .service(auth)
    .service(deauth)
    .service(get_profile)
    // Reached only when the method guard of the handler above did not match.
    .service(
        web::resource("/register").default_service(web::to(|| method_not_allowed(Method::POST))),
    )
    .service(
        web::resource("/auth").default_service(web::to(|| method_not_allowed(Method::POST))),
    )
    .service(
        web::resource("/deauth").default_service(web::to(|| method_not_allowed(Method::GET))),
    )
    .service(
        web::resource("/profile").default_service(web::to(|| method_not_allowed(Method::GET))),
    );
}

async fn method_not_allowed(allowed: Method) -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .insert_header(("Allow", allowed.as_str()))
        .content_type("text/plain; charset=utf-8")
        .body(format!("Invalid method, use {}", allowed))
}

#[post("/register")]
pub async fn register(pool: Data<DbPool>, params: Form<CredentialsForm>) -> Result<HttpResponse> {
    let CredentialsForm { name, password } = params.into_inner();

    let registered = name.clone();
    block(move || credentials::register(&mut *pool.get()?, &name, &password)).await??;

    log::info!("Registered user '{}'", registered);
    Ok(HttpResponse::Ok().finish())
}

#[post("/auth")]
pub async fn auth(pool: Data<DbPool>, params: Form<CredentialsForm>) -> Result<HttpResponse> {
    let CredentialsForm { name, password } = params.into_inner();

    let user = name.clone();
    let token = block(move || {
        let mut conn = pool.get()?;
        let user_id = credentials::verify(&mut conn, &name, &password)?;
        sessions::issue(&mut conn, user_id)
    })
    .await?
    .map_err(|err| {
        if !err.is_storage() {
            log::warn!("Failed authentication for user '{}': {}", user, err);
        }
        err
    })?;

    log::info!("Issued session for user '{}'", user);

    let cookie = Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .finish();
    Ok(HttpResponse::Ok().cookie(cookie).finish())
}

/// After a 200 the token is no longer valid, whether or not it was before.
#[get("/deauth")]
pub async fn deauth(pool: Data<DbPool>, token: Token) -> Result<HttpResponse> {
    block(move || sessions::revoke(&mut *pool.get()?, &token)).await??;
    log::info!("Session revoked");

    let mut expired = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    expired.make_removal();
    Ok(HttpResponse::Ok().cookie(expired).finish())
}

#[get("/profile")]
pub async fn get_profile(pool: Data<DbPool>, token: Token) -> Result<HttpResponse> {
    let profile = block(move || profile::get_profile(&mut *pool.get()?, &token)).await??;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(format!(
            "Your name is {} and your password is {}",
            profile.name, profile.password
        )))
}
