use std::sync::Arc;

use tracing::{debug, info};

use crate::application::dto::{AccessTokenResponse, LoginRequest};
use crate::application::errors::UseCaseError;
use crate::application::ports::{PasswordHasher, TokenError, TokenService, UserRepository};
use crate::application::validation::{parse_id, require_all};
use crate::domain::value_objects::UserId;

const UNAUTHORIZED: &str = "Unauthorized";
const FORBIDDEN: &str = "Forbidden";

/// Tokens issued on login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

fn token_failure(err: TokenError) -> UseCaseError {
    match err {
        TokenError::Invalid(_) => UseCaseError::Forbidden(FORBIDDEN.to_string()),
        TokenError::Encoding(e) => UseCaseError::Internal(e),
    }
}

/// Use case: Exchange credentials for an access token and a refresh token
pub struct LoginUseCase {
    user_repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl LoginUseCase {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            tokens,
        }
    }

    pub async fn execute(&self, request: &LoginRequest) -> Result<SessionTokens, UseCaseError> {
        let [username, password] = require_all(
            [&request.username, &request.password],
            "All fields are required",
        )?;

        let user = match self.user_repo.find_by_username(username).await? {
            Some(user) if user.is_active() => user,
            _ => {
                debug!("Login rejected for unknown or inactive user {}", username);
                return Err(UseCaseError::Unauthorized(UNAUTHORIZED.to_string()));
            }
        };

        if !self.hasher.verify(password, user.password_hash()).await? {
            debug!(user_id = %user.id(), "Login rejected: wrong password");
            return Err(UseCaseError::Unauthorized(UNAUTHORIZED.to_string()));
        }

        let access_token = self
            .tokens
            .issue_access_token(&user)
            .map_err(token_failure)?;
        let refresh_token = self
            .tokens
            .issue_refresh_token(&user)
            .map_err(token_failure)?;
        info!(user_id = %user.id(), "User {} logged in", user.username());

        Ok(SessionTokens {
            access_token,
            refresh_token,
        })
    }
}

/// Use case: Issue a fresh access token from a refresh token
pub struct RefreshUseCase {
    user_repo: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenService>,
}

impl RefreshUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>, tokens: Arc<dyn TokenService>) -> Self {
        Self { user_repo, tokens }
    }

    /// `refresh_token` is the value of the session cookie, if any
    pub async fn execute(
        &self,
        refresh_token: Option<&str>,
    ) -> Result<AccessTokenResponse, UseCaseError> {
        let refresh_token = refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| UseCaseError::Unauthorized(UNAUTHORIZED.to_string()))?;

        let claims = self
            .tokens
            .verify_refresh_token(refresh_token)
            .map_err(token_failure)?;
        let user_id: UserId =
            parse_id(&claims.sub, "sub").map_err(|_| UseCaseError::Forbidden(FORBIDDEN.into()))?;

        let user = match self.user_repo.find_by_id(&user_id).await? {
            Some(user) if user.is_active() => user,
            _ => return Err(UseCaseError::Unauthorized(UNAUTHORIZED.to_string())),
        };

        let access_token = self
            .tokens
            .issue_access_token(&user)
            .map_err(token_failure)?;
        Ok(AccessTokenResponse { access_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        MockPasswordHasher, MockTokenService, MockUserRepository, RefreshClaims,
    };
    use crate::domain::entities::User;

    fn tokens() -> MockTokenService {
        let mut tokens = MockTokenService::new();
        tokens
            .expect_issue_access_token()
            .returning(|u| Ok(format!("access:{}", u.username())));
        tokens
            .expect_issue_refresh_token()
            .returning(|u| Ok(format!("refresh:{}", u.username())));
        tokens
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_login_issues_both_tokens() {
        // Arrange
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .withf(|name| name == "dave")
            .returning(|_| Ok(Some(User::new("dave", "hash".into(), vec![]))));
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_verify()
            .withf(|password, hash| password == "secret" && hash == "hash")
            .returning(|_, _| Ok(true));
        let use_case = LoginUseCase::new(Arc::new(users), Arc::new(hasher), Arc::new(tokens()));

        // Act
        let session = use_case.execute(&login("dave", "secret")).await.unwrap();

        // Assert
        assert_eq!(session.access_token, "access:dave");
        assert_eq!(session.refresh_token, "refresh:dave");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Ok(Some(User::new("dave", "hash".into(), vec![]))));
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().returning(|_, _| Ok(false));
        let use_case = LoginUseCase::new(
            Arc::new(users),
            Arc::new(hasher),
            Arc::new(MockTokenService::new()),
        );

        let result = use_case.execute(&login("dave", "nope")).await;

        assert!(matches!(result, Err(UseCaseError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_login_inactive_user() {
        let mut inactive = User::new("dave", "hash".into(), vec![]);
        inactive
            .update_profile("dave", vec![crate::domain::value_objects::Role::Customer], false)
            .unwrap();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(move |_| Ok(Some(inactive.clone())));
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().times(0);
        let use_case = LoginUseCase::new(
            Arc::new(users),
            Arc::new(hasher),
            Arc::new(MockTokenService::new()),
        );

        let result = use_case.execute(&login("dave", "secret")).await;

        assert!(matches!(result, Err(UseCaseError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_login_requires_fields() {
        let use_case = LoginUseCase::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockPasswordHasher::new()),
            Arc::new(MockTokenService::new()),
        );

        let result = use_case.execute(&login("dave", "")).await;

        assert!(matches!(result, Err(UseCaseError::Validation(_))));
    }

    #[tokio::test]
    async fn test_refresh_without_cookie() {
        let use_case = RefreshUseCase::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockTokenService::new()),
        );

        let result = use_case.execute(None).await;

        assert!(matches!(result, Err(UseCaseError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_refresh_with_invalid_token() {
        let mut tokens = MockTokenService::new();
        tokens
            .expect_verify_refresh_token()
            .returning(|_| Err(TokenError::Invalid("expired".into())));
        let use_case = RefreshUseCase::new(Arc::new(MockUserRepository::new()), Arc::new(tokens));

        let result = use_case.execute(Some("stale")).await;

        assert!(matches!(result, Err(UseCaseError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_refresh_issues_access_token() {
        let user = User::new("dave", "hash".into(), vec![]);
        let sub = user.id().to_string();
        let mut tokens = tokens();
        tokens.expect_verify_refresh_token().returning(move |_| {
            Ok(RefreshClaims {
                sub: sub.clone(),
                username: "dave".into(),
                iat: 0,
                exp: usize::MAX,
            })
        });
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        let use_case = RefreshUseCase::new(Arc::new(users), Arc::new(tokens));

        let response = use_case.execute(Some("refresh:dave")).await.unwrap();

        assert_eq!(response.access_token, "access:dave");
    }
}
