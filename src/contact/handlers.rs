use axum::{extract::State, response::Redirect, routing::post, Form, Router};
use serde::Deserialize;
use tracing::{error, info, instrument};

use crate::{mailer::ContactMessage, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/send-message", post(send_message))
}

#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// Best effort: a relay failure never blocks the response. The outcome is
/// carried back as a transient notice on the public page.
#[instrument(skip(state, form))]
async fn send_message(State(state): State<AppState>, Form(form): Form<ContactForm>) -> Redirect {
    let msg = ContactMessage {
        name: form.name,
        email: form.email,
        phone: form.phone,
        subject: form.subject,
        message: form.message,
    };

    match state.mailer.send(&msg).await {
        Ok(()) => {
            info!("contact message relayed");
            Redirect::to("/?notice=sent#contact")
        }
        Err(e) => {
            error!(error = %e, "contact relay failed");
            Redirect::to("/?notice=send-failed#contact")
        }
    }
}
