//! Account service - signup, signin and token authentication.

use std::sync::Arc;

use crate::domain::{User, normalize_email};
use crate::error::{DomainError, FieldError, RepoError};
use crate::ports::{AuthError, PasswordService, TokenService, UserRepository};

/// Signup form.
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A user together with a freshly issued access token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
    pub expires_in: i64,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            users,
            tokens,
            passwords,
        }
    }

    pub async fn signup(&self, input: SignupInput) -> Result<AuthSession, DomainError> {
        validate_signup(&input)?;

        let email = normalize_email(&input.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }

        let password_hash = self.passwords.hash(&input.password)?;
        let user = User::new(input.name.trim().to_string(), &email, password_hash);

        let saved = match self.users.insert(user).await {
            Ok(saved) => saved,
            Err(RepoError::Constraint(_)) => {
                return Err(DomainError::Duplicate("Email already registered".to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id = %saved.id, "User registered");
        self.session_for(saved)
    }

    pub async fn signin(&self, email: &str, password: &str) -> Result<AuthSession, DomainError> {
        let user = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials.into());
        }

        self.session_for(user)
    }

    /// Resolve a bearer token to the user it was issued for.
    pub async fn authenticate(&self, token: &str) -> Result<User, DomainError> {
        let claims = self.tokens.validate_token(token)?;

        self.users
            .find_by_id(claims.user_id)
            .await?
            .ok_or_else(|| AuthError::InvalidToken("Unknown user".to_string()).into())
    }

    fn session_for(&self, user: User) -> Result<AuthSession, DomainError> {
        let token = self.tokens.generate_token(user.id, &user.email)?;
        Ok(AuthSession {
            user,
            token,
            expires_in: self.tokens.expiration_seconds(),
        })
    }
}

fn validate_signup(input: &SignupInput) -> Result<(), DomainError> {
    let mut errors = Vec::new();

    if input.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Required"));
    }

    let email = input.email.trim();
    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid_email {
        errors.push(FieldError::new("email", "Invalid email"));
    }

    if input.password.is_empty() {
        errors.push(FieldError::new("password", "Required"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(DomainError::InvalidFields(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::TokenClaims;
    use crate::services::testing::FakeUserRepository;
    use uuid::Uuid;

    /// Token "service" that encodes the user id verbatim.
    struct PlainTokens;

    impl TokenService for PlainTokens {
        fn generate_token(&self, user_id: Uuid, _email: &str) -> Result<String, AuthError> {
            Ok(user_id.to_string())
        }

        fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
            let user_id =
                Uuid::parse_str(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
            Ok(TokenClaims {
                user_id,
                email: String::new(),
                exp: 0,
            })
        }

        fn expiration_seconds(&self) -> i64 {
            3600
        }
    }

    /// Password "hasher" that reverses the input.
    struct ReversedPasswords;

    impl PasswordService for ReversedPasswords {
        fn hash(&self, password: &str) -> Result<String, AuthError> {
            Ok(password.chars().rev().collect())
        }

        fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
            Ok(self.hash(password)? == hash)
        }
    }

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(FakeUserRepository::default()),
            Arc::new(PlainTokens),
            Arc::new(ReversedPasswords),
        )
    }

    fn signup_input(email: &str) -> SignupInput {
        SignupInput {
            name: "Ada".to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_normalizes_email_and_rejects_duplicates() {
        let auth = service();

        let session = auth.signup(signup_input("Ada@Example.COM")).await.unwrap();
        assert_eq!(session.user.email, "ada@example.com");
        assert_ne!(session.user.password_hash, "secret");
        assert_eq!(session.expires_in, 3600);

        let duplicate = auth.signup(signup_input("ADA@example.com")).await;
        assert!(matches!(duplicate, Err(DomainError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_signup_reports_field_errors() {
        let auth = service();

        let result = auth
            .signup(SignupInput {
                name: " ".to_string(),
                email: "not-an-email".to_string(),
                password: String::new(),
            })
            .await;

        match result {
            Err(DomainError::InvalidFields(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["name", "email", "password"]);
            }
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_signin_and_authenticate() {
        let auth = service();
        let created = auth.signup(signup_input("ada@example.com")).await.unwrap();

        let session = auth.signin("ADA@example.com", "secret").await.unwrap();
        assert_eq!(session.user.id, created.user.id);

        let user = auth.authenticate(&session.token).await.unwrap();
        assert_eq!(user.id, created.user.id);
    }

    #[tokio::test]
    async fn test_signin_rejects_bad_credentials() {
        let auth = service();
        auth.signup(signup_input("ada@example.com")).await.unwrap();

        assert!(matches!(
            auth.signin("ada@example.com", "wrong").await,
            Err(DomainError::Auth(AuthError::InvalidCredentials))
        ));
        assert!(matches!(
            auth.signin("nobody@example.com", "secret").await,
            Err(DomainError::Auth(AuthError::InvalidCredentials))
        ));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user() {
        let auth = service();
        let result = auth.authenticate(&Uuid::new_v4().to_string()).await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::InvalidToken(_)))
        ));
    }
}
