//! # Authentication Commands
//!
//! Login and registration go to the backend; the returned token and user
//! are persisted through [`SessionState`] so later commands see them.

use tracing::{debug, info};

use crate::commands::UserDto;
use crate::error::ApiError;
use crate::state::SessionState;
use drivehub_client::{BookingBackend, Registration};

fn require_field(name: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{} is required", name)));
    }
    Ok(())
}

/// Signs in and stores the session.
pub async fn login(
    backend: &dyn BookingBackend,
    session: &mut SessionState,
    email: &str,
    password: &str,
) -> Result<UserDto, ApiError> {
    debug!(email = %email, "login command");

    require_field("email", email)?;
    require_field("password", password)?;

    let identity = backend.login(email.trim(), password).await?;
    let user = UserDto::from(&identity.user);
    session.sign_in(identity)?;

    info!(user_id = %user.id, role = %user.role, "Signed in");
    Ok(user)
}

/// Creates a renter account and signs in with it.
pub async fn register(
    backend: &dyn BookingBackend,
    session: &mut SessionState,
    name: &str,
    email: &str,
    password: &str,
) -> Result<UserDto, ApiError> {
    debug!(email = %email, "register command");

    require_field("name", name)?;
    require_field("email", email)?;
    require_field("password", password)?;

    let registration = Registration {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        password: password.to_string(),
    };
    let identity = backend.register(&registration).await?;
    let user = UserDto::from(&identity.user);
    session.sign_in(identity)?;

    info!(user_id = %user.id, "Registered");
    Ok(user)
}

pub fn logout(session: &mut SessionState) -> Result<(), ApiError> {
    debug!("logout command");
    session.sign_out()?;
    Ok(())
}

pub fn whoami(session: &SessionState) -> Option<UserDto> {
    session.session().user().map(UserDto::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{self, FakeBackend};
    use crate::error::ErrorCode;
    use drivehub_core::Role;

    #[tokio::test]
    async fn test_login_persists_session() {
        let backend = FakeBackend::default();
        let mut session = testing::session(None);

        let user = login(&backend, &mut session, "ana@example.com", "secret")
            .await
            .unwrap();
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(whoami(&session), Some(user));

        logout(&mut session).unwrap();
        assert_eq!(whoami(&session), None);
    }

    #[tokio::test]
    async fn test_login_rejected_keeps_signed_out() {
        let backend = FakeBackend::default();
        let mut session = testing::session(None);

        let err = login(&backend, &mut session, "ana@example.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BackendError);
        assert_eq!(err.message, "Invalid credentials");
        assert!(whoami(&session).is_none());
    }

    #[tokio::test]
    async fn test_empty_fields_never_reach_backend() {
        let backend = FakeBackend::default();
        let mut session = testing::session(None);

        let err = login(&backend, &mut session, "  ", "secret").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = register(&backend, &mut session, "", "a@b.c", "pw")
            .await
            .unwrap_err();
        assert_eq!(err.message, "name is required");
    }

    #[tokio::test]
    async fn test_register_signs_in_as_renter() {
        let backend = FakeBackend::default();
        let mut session = testing::session(None);

        let user = register(&backend, &mut session, " Bo ", "bo@example.com", "pw")
            .await
            .unwrap();
        assert_eq!(user.name, "Bo");
        assert_eq!(user.role, Role::Renter);
        assert_eq!(session.session().token(), Some("tok-new"));
    }
}
