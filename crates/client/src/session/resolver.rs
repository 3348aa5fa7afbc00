//! Session resolver.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use tracing::{debug, info, warn};

use crate::{
    api::StorefrontApi,
    errors::{ActionError, messages},
    navigation::Outcome,
    session::models::{Credentials, Session, User},
};

static ANONYMOUS: Session = Session::Anonymous;

/// Owns the client's notion of who is logged in.
///
/// The session is looked up once at startup; until then [`Self::is_resolved`]
/// is false and nothing else should render. Login and logout replace the
/// session wholesale.
pub struct SessionResolver {
    api: Arc<dyn StorefrontApi>,
    session: Option<Session>,
}

impl SessionResolver {
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self { api, session: None }
    }

    /// Resolve the current user, contacting the backend only the first time.
    ///
    /// A failed lookup is not an error: it means nobody is logged in.
    pub async fn resolve(&mut self) -> &Session {
        if self.session.is_none() {
            let session = self.lookup().await;

            info!(authenticated = session.is_authenticated(), "session resolved");

            self.session = Some(session);
        }

        self.current()
    }

    pub fn is_resolved(&self) -> bool {
        self.session.is_some()
    }

    /// The resolved session; anonymous until resolution has happened.
    pub fn current(&self) -> &Session {
        self.session.as_ref().unwrap_or(&ANONYMOUS)
    }

    pub fn user(&self) -> Option<&User> {
        self.current().user()
    }

    /// Log in and replace the session with the freshly resolved user.
    ///
    /// # Errors
    ///
    /// Returns an error when the form is incomplete or the backend rejects
    /// the credentials; the session is left unchanged.
    pub async fn login(&mut self, credentials: Credentials) -> Result<Outcome, ActionError> {
        validate(&credentials, "login")?;

        let email = credentials.email.clone();

        self.api
            .login(credentials)
            .await
            .map_err(|cause| ActionError::new("login", cause, messages::LOGIN))?;

        let session = match self.lookup().await {
            Session::Anonymous => {
                debug!("user lookup after login came back empty, using login email");

                Session::Authenticated(User { email })
            }
            authenticated @ Session::Authenticated(_) => authenticated,
        };

        self.session = Some(session);

        info!("logged in");

        Ok(Outcome::LoggedIn)
    }

    /// Create an account. The user still has to log in afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error when the form is incomplete or the backend refuses
    /// the registration, e.g. because the email is taken.
    pub async fn register(&self, credentials: Credentials) -> Result<Outcome, ActionError> {
        validate(&credentials, "register")?;

        self.api
            .register(credentials)
            .await
            .map_err(|cause| ActionError::new("register", cause, messages::REGISTER))?;

        info!("account registered");

        Ok(Outcome::Registered)
    }

    /// Log out. The local session always ends up anonymous, even when the
    /// backend call fails; the failure is only logged.
    pub async fn logout(&mut self) -> Outcome {
        if let Err(error) = self.api.logout().await {
            warn!(%error, "logout request failed, clearing local session anyway");
        }

        self.session = Some(Session::Anonymous);

        info!("logged out");

        Outcome::LoggedOut
    }

    async fn lookup(&self) -> Session {
        match self.api.current_user().await {
            Ok(Some(user)) => Session::Authenticated(user),
            Ok(None) => Session::Anonymous,
            Err(error) => {
                warn!(%error, "session lookup failed, continuing anonymously");

                Session::Anonymous
            }
        }
    }
}

fn validate(credentials: &Credentials, action: &'static str) -> Result<(), ActionError> {
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(ActionError::validation(action, messages::MISSING_CREDENTIALS));
    }

    Ok(())
}

impl Debug for SessionResolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SessionResolver")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        api::{MockStorefrontApi, StorefrontError},
        test::network_error,
    };

    use super::*;

    fn user(email: &str) -> User {
        User {
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn resolves_exactly_once() {
        let mut api = MockStorefrontApi::new();

        api.expect_current_user()
            .once()
            .return_once(|| Ok(Some(user("ana@example.com"))));

        let mut resolver = SessionResolver::new(Arc::new(api));

        assert!(!resolver.is_resolved());

        resolver.resolve().await;
        let session = resolver.resolve().await;

        assert_eq!(session, &Session::Authenticated(user("ana@example.com")));
        assert!(resolver.is_resolved());
    }

    #[tokio::test]
    async fn failed_lookup_is_anonymous_not_an_error() {
        let mut api = MockStorefrontApi::new();

        api.expect_current_user()
            .once()
            .return_once(|| Err(network_error()));

        let mut resolver = SessionResolver::new(Arc::new(api));

        assert_eq!(resolver.resolve().await, &Session::Anonymous);
        assert!(resolver.is_resolved());
    }

    #[tokio::test]
    async fn logout_clears_session_even_when_request_fails() {
        let mut api = MockStorefrontApi::new();

        api.expect_current_user()
            .once()
            .return_once(|| Ok(Some(user("ana@example.com"))));
        api.expect_logout()
            .once()
            .return_once(|| Err(network_error()));

        let mut resolver = SessionResolver::new(Arc::new(api));

        resolver.resolve().await;

        let outcome = resolver.logout().await;

        assert_eq!(outcome, Outcome::LoggedOut);
        assert_eq!(resolver.current(), &Session::Anonymous);
        assert_eq!(outcome.next_route(), crate::navigation::Route::Login);
    }

    #[tokio::test]
    async fn login_replaces_session_with_backend_user() -> TestResult {
        let mut api = MockStorefrontApi::new();
        let mut lookups = 0;

        api.expect_current_user().times(2).returning(move || {
            lookups += 1;

            Ok((lookups > 1).then(|| user("ana@example.com")))
        });
        api.expect_login()
            .once()
            .withf(|credentials| credentials.email == "ana@example.com")
            .return_once(|_| Ok(()));

        let mut resolver = SessionResolver::new(Arc::new(api));

        assert_eq!(resolver.resolve().await, &Session::Anonymous);

        let outcome = resolver
            .login(Credentials::new("ana@example.com", "s3cret"))
            .await?;

        assert_eq!(outcome, Outcome::LoggedIn);
        assert_eq!(resolver.user(), Some(&user("ana@example.com")));

        Ok(())
    }

    #[tokio::test]
    async fn rejected_login_keeps_anonymous_session() {
        let mut api = MockStorefrontApi::new();

        api.expect_current_user().once().return_once(|| Ok(None));
        api.expect_login().once().return_once(|_| {
            Err(StorefrontError::Api {
                status: 401,
                message: None,
            })
        });

        let mut resolver = SessionResolver::new(Arc::new(api));

        resolver.resolve().await;

        let result = resolver
            .login(Credentials::new("ana@example.com", "wrong"))
            .await;

        assert!(
            matches!(&result, Err(error) if error.message() == messages::LOGIN),
            "expected login failure, got {result:?}"
        );
        assert_eq!(resolver.current(), &Session::Anonymous);
    }

    #[tokio::test]
    async fn incomplete_forms_are_rejected_locally() {
        let mut api = MockStorefrontApi::new();

        api.expect_register().never();
        api.expect_login().never();

        let mut resolver = SessionResolver::new(Arc::new(api));

        let registered = resolver.register(Credentials::new(" ", "secret")).await;
        let logged_in = resolver.login(Credentials::new("ana@example.com", "")).await;

        assert!(
            matches!(&registered, Err(error) if error.is_validation()),
            "expected validation error, got {registered:?}"
        );
        assert!(
            matches!(&logged_in, Err(error) if error.is_validation()),
            "expected validation error, got {logged_in:?}"
        );
    }

    #[tokio::test]
    async fn duplicate_registration_surfaces_backend_message() {
        let mut api = MockStorefrontApi::new();

        api.expect_register().once().return_once(|_| {
            Err(StorefrontError::Api {
                status: 400,
                message: Some("Usuário já existe".to_string()),
            })
        });

        let resolver = SessionResolver::new(Arc::new(api));
        let result = resolver
            .register(Credentials::new("ana@example.com", "secret"))
            .await;

        assert!(
            matches!(&result, Err(error) if error.message() == "Usuário já existe"),
            "expected backend message, got {result:?}"
        );
    }

    #[tokio::test]
    async fn registration_leads_to_login() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_register().once().return_once(|_| Ok(()));

        let resolver = SessionResolver::new(Arc::new(api));
        let outcome = resolver
            .register(Credentials::new("ana@example.com", "secret"))
            .await?;

        assert_eq!(outcome.next_route(), crate::navigation::Route::Login);

        Ok(())
    }
}
