//! Authentication route handlers.
//!
//! Sign-in is deliberately mock: any valid email installs the demo account
//! for this session. There is no password and no account backend; the flow
//! exists so the session, Sentry user context, and sign-out path behave like
//! the real thing.

use axum::{Form, response::Redirect};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopverse_core::store::Action;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::models::session::{apply_actions, load_store};

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
}

/// Handle login form submission.
#[instrument(skip(session), fields(email = %form.email))]
pub async fn login(session: Session, Form(form): Form<LoginForm>) -> Result<Redirect> {
    let email = form.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::BadRequest(
            "a valid email address is required".to_owned(),
        ));
    }

    let mut store = load_store(&session).await;
    apply_actions(&session, &mut store, [Action::Login { email }]).await?;

    if let Some(user) = store.user.as_ref() {
        set_sentry_user(&user.id, Some(&user.email));
        tracing::info!(user_id = %user.id, "signed in");
    }

    Ok(Redirect::to("/"))
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    let mut store = load_store(&session).await;
    apply_actions(&session, &mut store, [Action::Logout]).await?;
    clear_sentry_user();

    Ok(Redirect::to("/"))
}

/// Basic email validation.
fn is_valid_email(email: &str) -> bool {
    // Simple validation: contains @, has content before and after @
    let mut parts = email.splitn(2, '@');
    let Some(local) = parts.next() else {
        return false;
    };
    let Some(domain) = parts.next() else {
        return false;
    };
    !local.is_empty() && !domain.is_empty() && domain.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("user.name@domain.co.uk"));
        assert!(is_valid_email("a@b.c"));

        assert!(!is_valid_email(""));
        assert!(!is_valid_email("@"));
        assert!(!is_valid_email("test@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("test@domain")); // no TLD
        assert!(!is_valid_email("test"));
    }
}
