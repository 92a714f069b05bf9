use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use tracing::warn;

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, RegisterRequest, User};
use crate::infrastructure::mailer::Mailer;
use crate::infrastructure::tokens::TokenService;

#[derive(Debug, Clone)]
pub(crate) struct AuthResult {
    pub(crate) user: User,
    pub(crate) access_token: String,
}

pub(crate) struct AuthService<R: UserRepository> {
    repo: R,
    session_tokens: Arc<TokenService>,
    email_tokens: Arc<TokenService>,
    mailer: Mailer,
}

impl<R: UserRepository> AuthService<R> {
    const DUMMY_PASSWORD_HASH: &'static str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

    pub(crate) fn new(
        repo: R,
        session_tokens: Arc<TokenService>,
        email_tokens: Arc<TokenService>,
        mailer: Mailer,
    ) -> Self {
        Self {
            repo,
            session_tokens,
            email_tokens,
            mailer,
        }
    }

    /// Creates an unverified account and fires off the verification email.
    /// No session token is issued: login requires a verified address.
    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<User, DomainError> {
        let req = req.validate()?;

        let password_hash = self.hash_password(&req.password)?;

        let new_user = Self::into_new_user(req, password_hash);
        let user = self.repo.create_user(new_user).await?;

        let verification_token = self
            .email_tokens
            .issue(user.id, &user.email)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        // Fire-and-forget: a lost email is logged, never retried, and does not
        // fail the registration.
        let mailer = self.mailer.clone();
        let recipient = user.email.clone();
        tokio::spawn(async move {
            if let Err(err) = mailer
                .send_verification_email(&recipient, &verification_token)
                .await
            {
                warn!(%recipient, "failed to send verification email: {err:#}");
            }
        });

        Ok(user)
    }

    pub(crate) async fn verify_email(&self, token: &str) -> Result<(), DomainError> {
        let claims = self.email_tokens.verify(token).map_err(|_| invalid_token())?;

        let verified = self.repo.mark_verified(claims.user_id, &claims.email).await?;
        if !verified {
            return Err(invalid_token());
        }
        Ok(())
    }

    pub(crate) async fn login(&self, req: LoginRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        let user_creds = match self.repo.find_by_email(&req.email).await? {
            Some(user_creds) => user_creds,
            None => {
                // стремимся к одинаковому времени проверки если user не найден
                match self.verify_password(&req.password, Self::DUMMY_PASSWORD_HASH) {
                    Ok(()) | Err(DomainError::InvalidCredentials) => {}
                    Err(err) => return Err(err),
                }
                return Err(DomainError::InvalidCredentials);
            }
        };

        self.verify_password(&req.password, &user_creds.password_hash)?;

        if !user_creds.user.is_verified {
            return Err(DomainError::EmailNotVerified);
        }

        let access_token = self
            .session_tokens
            .issue(user_creds.user.id, &user_creds.user.email)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(AuthResult {
            user: user_creds.user,
            access_token,
        })
    }

    pub(crate) async fn current_user(&self, user_id: i64) -> Result<User, DomainError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound(format!("user id: {user_id}")))
    }

    pub(crate) async fn username_of(&self, user_id: i64) -> Result<String, DomainError> {
        self.repo
            .find_username(user_id)
            .await?
            .ok_or(DomainError::NotFound(format!("user id: {user_id}")))
    }

    pub(crate) fn hash_password(&self, raw_password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Self::argon2()?
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(password_hash.to_string())
    }

    pub(crate) fn verify_password(
        &self,
        raw_password: &str,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Self::argon2()?
            .verify_password(raw_password.as_bytes(), &parsed_hash)
            .map_err(|err| match err {
                PasswordHashError::Password => DomainError::InvalidCredentials,
                _ => DomainError::Unexpected(err.to_string()),
            })?;

        Ok(())
    }

    fn into_new_user(req: RegisterRequest, password_hash: String) -> NewUser {
        NewUser {
            username: req.username,
            email: req.email,
            password_hash,
        }
    }

    fn argon2() -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(19 * 1024, 2, 1, None)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

fn invalid_token() -> DomainError {
    DomainError::Validation {
        field: "token",
        message: "invalid or expired verification token",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::AuthService;
    use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
    use crate::domain::error::DomainError;
    use crate::domain::user::{LoginRequest, RegisterRequest, User};
    use crate::infrastructure::mailer::Mailer;
    use crate::infrastructure::settings::SmtpSettings;
    use crate::infrastructure::tokens::TokenService;

    #[derive(Clone)]
    struct FakeUserRepo {
        created_input: Arc<Mutex<Option<NewUser>>>,
        login_credentials: Arc<Mutex<Option<UserCredentials>>>,
        verified_call: Arc<Mutex<Option<(i64, String)>>>,
        verify_result: Arc<Mutex<bool>>,
        create_user_out: User,
    }

    impl FakeUserRepo {
        fn new(create_user_out: User) -> Self {
            Self {
                created_input: Arc::new(Mutex::new(None)),
                login_credentials: Arc::new(Mutex::new(None)),
                verified_call: Arc::new(Mutex::new(None)),
                verify_result: Arc::new(Mutex::new(true)),
                create_user_out,
            }
        }

        fn set_login_credentials(&self, creds: Option<UserCredentials>) {
            *self
                .login_credentials
                .lock()
                .expect("login credentials mutex poisoned") = creds;
        }

        fn take_created_input(&self) -> Option<NewUser> {
            self.created_input
                .lock()
                .expect("created input mutex poisoned")
                .take()
        }
    }

    #[async_trait]
    impl UserRepository for FakeUserRepo {
        async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
            *self
                .created_input
                .lock()
                .expect("created input mutex poisoned") = Some(input);
            Ok(self.create_user_out.clone())
        }

        async fn find_by_email(
            &self,
            _email: &str,
        ) -> Result<Option<UserCredentials>, DomainError> {
            Ok(self
                .login_credentials
                .lock()
                .expect("login credentials mutex poisoned")
                .clone())
        }

        async fn find_by_id(&self, _id: i64) -> Result<Option<User>, DomainError> {
            Ok(Some(self.create_user_out.clone()))
        }

        async fn find_username(&self, _id: i64) -> Result<Option<String>, DomainError> {
            Ok(Some(self.create_user_out.username.clone()))
        }

        async fn mark_verified(&self, id: i64, email: &str) -> Result<bool, DomainError> {
            *self
                .verified_call
                .lock()
                .expect("verified call mutex poisoned") = Some((id, email.to_string()));
            Ok(*self
                .verify_result
                .lock()
                .expect("verify result mutex poisoned"))
        }
    }

    #[tokio::test]
    async fn register_creates_unverified_user_without_session_token() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com", false));
        let service = test_service(repo.clone());

        let req = RegisterRequest {
            username: "  valid_user  ".to_string(),
            email: "  VALID@EXAMPLE.COM  ".to_string(),
            password: "very-secure-password".to_string(),
        };

        let user = service.register(req).await.expect("register must succeed");

        assert_eq!(user.username, "valid_user");
        assert!(!user.is_verified);

        let created = repo
            .take_created_input()
            .expect("create_user must be called");
        assert_eq!(created.username, "valid_user");
        assert_eq!(created.email, "valid@example.com");
        assert!(!created.password_hash.is_empty());
        assert_ne!(created.password_hash, "very-secure-password");
    }

    #[tokio::test]
    async fn verify_email_accepts_own_tokens_and_rejects_session_tokens() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com", false));
        let service = test_service(repo.clone());

        let token = test_email_tokens()
            .issue(1, "valid@example.com")
            .expect("issue works");
        service
            .verify_email(&token)
            .await
            .expect("verification must succeed");
        let call = repo
            .verified_call
            .lock()
            .expect("verified call mutex poisoned")
            .clone()
            .expect("mark_verified must be called");
        assert_eq!(call, (1, "valid@example.com".to_string()));

        // A session token is signed with the other secret and must not verify.
        let session_token = test_session_tokens()
            .issue(1, "valid@example.com")
            .expect("issue works");
        let err = service
            .verify_email(&session_token)
            .await
            .expect_err("session token must be rejected");
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn login_returns_invalid_credentials_for_missing_user() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com", true));
        repo.set_login_credentials(None);
        let service = test_service(repo);

        let req = LoginRequest {
            email: "valid@example.com".to_string(),
            password: "some-password".to_string(),
        };

        let err = service.login(req).await.expect_err("login must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_returns_invalid_credentials_for_wrong_password() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com", true));
        let service = test_service(repo.clone());

        let hash = service
            .hash_password("correct-password")
            .expect("hash must be created");
        repo.set_login_credentials(Some(UserCredentials {
            user: sample_user(1, "valid_user", "valid@example.com", true),
            password_hash: hash,
        }));

        let req = LoginRequest {
            email: "valid@example.com".to_string(),
            password: "wrong-password".to_string(),
        };

        let err = service.login(req).await.expect_err("login must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_rejects_unverified_account() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com", false));
        let service = test_service(repo.clone());

        let hash = service
            .hash_password("correct-password")
            .expect("hash must be created");
        repo.set_login_credentials(Some(UserCredentials {
            user: sample_user(1, "valid_user", "valid@example.com", false),
            password_hash: hash,
        }));

        let req = LoginRequest {
            email: "valid@example.com".to_string(),
            password: "correct-password".to_string(),
        };

        let err = service.login(req).await.expect_err("login must fail");
        assert!(matches!(err, DomainError::EmailNotVerified));
    }

    #[tokio::test]
    async fn login_returns_token_for_valid_credentials() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com", true));
        let service = test_service(repo.clone());

        let hash = service
            .hash_password("correct-password")
            .expect("hash must be created");
        repo.set_login_credentials(Some(UserCredentials {
            user: sample_user(1, "valid_user", "valid@example.com", true),
            password_hash: hash,
        }));

        let req = LoginRequest {
            email: "valid@example.com".to_string(),
            password: "correct-password".to_string(),
        };

        let result = service.login(req).await.expect("login must succeed");
        assert_eq!(result.user.id, 1);
        assert!(!result.access_token.is_empty());

        let claims = test_session_tokens()
            .verify(&result.access_token)
            .expect("issued token must verify against the session context");
        assert_eq!(claims.user_id, 1);
    }

    fn sample_user(id: i64, username: &str, email: &str, is_verified: bool) -> User {
        User::new(
            id,
            username.to_string(),
            email.to_string(),
            is_verified,
            Utc::now(),
        )
        .expect("sample user must be valid")
    }

    fn test_service(repo: FakeUserRepo) -> AuthService<FakeUserRepo> {
        AuthService::new(
            repo,
            Arc::new(test_session_tokens()),
            Arc::new(test_email_tokens()),
            test_mailer(),
        )
    }

    fn test_session_tokens() -> TokenService {
        TokenService::new("0123456789abcdef0123456789abcdef", 3600)
    }

    fn test_email_tokens() -> TokenService {
        TokenService::new("fedcba9876543210fedcba9876543210", 3600)
    }

    fn test_mailer() -> Mailer {
        let smtp = SmtpSettings {
            host: String::new(),
            port: 587,
            username: None,
            password: None,
            from: "Bloggy <no-reply@bloggy.local>".to_string(),
        };
        Mailer::new(&smtp, "http://localhost:8080/api/auth/verify").expect("no-op mailer builds")
    }
}
