use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        password::verify_password,
        repo::User,
        session::{SessionKeys, SESSION_COOKIE},
    },
    error::AppError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

async fn login_page() -> Html<String> {
    Html(login_html(None))
}

#[instrument(skip(state, jar, form))]
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match authenticate(&state, &form).await {
        Ok(user) => {
            let token = SessionKeys::from_ref(&state).sign(user.id)?;
            let cookie = Cookie::build((SESSION_COOKIE, token))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .build();
            info!(user_id = user.id, "admin logged in");
            Ok((jar.add(cookie), Redirect::to("/admin/dashboard")).into_response())
        }
        Err(AppError::InvalidCredentials) => Ok((
            StatusCode::UNAUTHORIZED,
            Html(login_html(Some("Invalid credentials."))),
        )
            .into_response()),
        Err(AppError::AccessDenied) => Ok((
            StatusCode::FORBIDDEN,
            Html(login_html(Some("Access denied."))),
        )
            .into_response()),
        Err(e) => Err(e),
    }
}

async fn authenticate(state: &AppState, form: &LoginForm) -> Result<User, AppError> {
    let Some(user) = User::find_by_email(&state.db, form.email.trim()).await? else {
        warn!(email = %form.email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&form.password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    if !user.is_admin {
        warn!(user_id = user.id, "login without admin flag");
        return Err(AppError::AccessDenied);
    }

    Ok(user)
}

#[instrument(skip(jar))]
async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    let cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (jar.remove(cookie), Redirect::to("/"))
}

fn login_html(notice: Option<&str>) -> String {
    let notice = notice
        .map(|n| format!("<p class=\"notice\">{n}</p>"))
        .unwrap_or_default();
    format!(
        "<!doctype html><html><head><title>Admin Login</title></head><body>\
         <h1>Admin Login</h1>{notice}\
         <form method=\"post\" action=\"/admin/login\">\
         <input type=\"email\" name=\"email\" placeholder=\"Email\">\
         <input type=\"password\" name=\"password\" placeholder=\"Password\">\
         <button type=\"submit\">Log in</button>\
         </form></body></html>"
    )
}
