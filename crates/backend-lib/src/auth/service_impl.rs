use std::sync::Arc;
use std::time::Duration;

use ::metrics::counter;
use async_trait::async_trait;
use chrono::Utc;
use gatekeeper_common::{SignInRequest, SignInResponse, SignUpRequest, SignUpResponse, Subject};
use tokio::task::JoinError;
use tracing::{debug, info, instrument, warn};

use crate::auth::{issue_refresh_token, AuthError, AuthService, PasswordHasher, TokenIssuer};
use crate::config::AuthSettings;
use crate::metrics;
use crate::repository::{NewUser, RepoError, UserRepository, UserSelector};
use crate::store::ExpiringStore;

/// Role attached to every session subject
pub const DEFAULT_ROLE: &str = "user";

/// Store key for the session identified by a refresh value
pub fn session_key(refresh_token: &str) -> String {
    format!("session:{refresh_token}")
}

fn join_error(err: JoinError) -> AuthError {
    AuthError::Internal(format!("hashing task failed: {err}"))
}

pub struct DefaultAuth {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn ExpiringStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
    access_expire: Duration,
}

impl DefaultAuth {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn ExpiringStore>,
        hasher: PasswordHasher,
        tokens: TokenIssuer,
        access_expire: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            hasher,
            tokens,
            access_expire,
        }
    }

    /// Build from settings, deriving the hasher and token issuer
    pub fn from_settings(
        settings: &AuthSettings,
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn ExpiringStore>,
    ) -> Result<Self, AuthError> {
        let hasher = PasswordHasher::from_settings(settings)?;
        let tokens = TokenIssuer::new(settings.token_secret.clone());
        Ok(Self::new(users, sessions, hasher, tokens, settings.access_expire()))
    }

    fn expiration(&self) -> i64 {
        let lifetime = i64::try_from(self.access_expire.as_secs()).unwrap_or(i64::MAX);
        Utc::now().timestamp().saturating_add(lifetime)
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    #[instrument(skip_all)]
    async fn sign_up(&self, req: SignUpRequest) -> Result<SignUpResponse, AuthError> {
        let selector = UserSelector::new(req.email.clone(), req.phone.clone());
        if selector.is_empty() {
            return Err(AuthError::Validation(
                "either phone or email is required".to_string(),
            ));
        }

        // scrypt is CPU bound; keep it off the reactor threads
        let hasher = self.hasher;
        let mut password = req.password;
        let hash = tokio::task::spawn_blocking(move || hasher.hash_secure(&mut password))
            .await
            .map_err(join_error)??;

        if self.users.exists(&selector).await? {
            counter!(metrics::AUTH_SIGNUP_CONFLICT).increment(1);
            return Err(AuthError::UserAlreadyExists);
        }

        // A concurrent signup can pass the check above; the repository's
        // unique constraint then reports Conflict, which maps to the same error.
        let user = self
            .users
            .create(NewUser {
                email: req.email,
                phone: req.phone,
                password: hash,
            })
            .await
            .inspect_err(|err| {
                if matches!(err, RepoError::Conflict(_)) {
                    counter!(metrics::AUTH_SIGNUP_CONFLICT).increment(1);
                }
            })?;

        counter!(metrics::AUTH_SIGNUP).increment(1);
        info!(user_id = user.id, "user signed up");

        Ok(SignUpResponse {
            id: user.id,
            email: user.email,
            phone: user.phone,
        })
    }

    #[instrument(skip_all)]
    async fn sign_in(&self, req: SignInRequest) -> Result<SignInResponse, AuthError> {
        let selector = UserSelector::new(req.email, req.phone);
        if selector.is_empty() {
            return Err(AuthError::Validation(
                "either phone or email is required".to_string(),
            ));
        }

        let user = match self.users.get(&selector).await {
            Ok(user) => user,
            Err(RepoError::NotExists) => {
                counter!(metrics::AUTH_SIGNIN_FAILED).increment(1);
                debug!("signin for unknown identity");
                return Err(AuthError::WrongUsernameOrPassword);
            }
            Err(err) => return Err(err.into()),
        };

        let hasher = self.hasher;
        let stored = user.password.clone();
        let plain = req.password;
        let verified = tokio::task::spawn_blocking(move || hasher.verify(&stored, &plain))
            .await
            .map_err(join_error)?;
        if verified.is_err() {
            counter!(metrics::AUTH_SIGNIN_FAILED).increment(1);
            warn!(user_id = user.id, "signin with wrong password");
            return Err(AuthError::WrongUsernameOrPassword);
        }

        let expiration = self.expiration();
        let access_token =
            self.tokens
                .issue_access_token(user.id, &user.email, &user.phone, expiration)?;
        let refresh_token = issue_refresh_token(&user.email, &user.phone, self.tokens.secret());

        let subject = Subject {
            id: user.id,
            email: user.email,
            phone: user.phone,
            roles: vec![DEFAULT_ROLE.to_string()],
        };
        self.sessions
            .set(&session_key(&refresh_token), &subject)
            .await?;

        counter!(metrics::AUTH_SIGNIN).increment(1);
        counter!(metrics::SESSION_CREATED).increment(1);
        info!(user_id = subject.id, expiration, "user signed in");

        Ok(SignInResponse {
            access_token,
            refresh_token,
            expiration,
        })
    }

    #[instrument(skip_all)]
    async fn session(&self, refresh_token: &str) -> Result<Subject, AuthError> {
        Ok(self.sessions.get(&session_key(refresh_token)).await?)
    }

    #[instrument(skip_all)]
    async fn sign_out(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.sessions.del(&session_key(refresh_token)).await?;
        counter!(metrics::AUTH_SIGNOUT).increment(1);
        Ok(())
    }
}
