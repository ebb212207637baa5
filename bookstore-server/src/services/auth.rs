//! Account service: signup, login, password restore and token authentication

use std::sync::Arc;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{AuthResponse, LoginRequest, RestoreRequest, Role, SignupRequest, User, UserPublic};

use crate::auth::password::{
    PasswordHash, generate_temporary_password, hash_password, matches_temporary, verify_password,
};
use crate::auth::{CurrentUser, JwtService};
use crate::db::DocumentStore;
use crate::db::repository::UserRepository;
use crate::db::repository::user::{NewUser, normalize_contacts};
use crate::notify::{SharedNotifier, temporary_password_text};
use crate::security_log;
use crate::utils::validation::{is_email_login, validate_password};

use super::blocking;

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    jwt: Arc<JwtService>,
    notifier: SharedNotifier,
}

impl AuthService {
    pub fn new(store: DocumentStore, jwt: Arc<JwtService>, notifier: SharedNotifier) -> Self {
        Self {
            users: UserRepository::new(store),
            jwt,
            notifier,
        }
    }

    fn issue(&self, user: &User) -> AppResult<AuthResponse> {
        Ok(AuthResponse {
            token: self.jwt.generate_token(&user.id)?,
            user: UserPublic::from(user),
        })
    }

    pub async fn signup(&self, req: SignupRequest) -> AppResult<AuthResponse> {
        let (phone_number, email) =
            normalize_contacts(&req.first_name, &req.last_name, &req.phone_number, &req.email)?;
        validate_password(&req.password)?;

        let password = req.password;
        let credentials: PasswordHash = blocking(move || hash_password(&password)).await??;
        let user = self.users.create(NewUser {
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number,
            email,
            credentials,
            role: Role::User,
        })?;

        security_log!("INFO", "signup", user_id = user.id.clone());
        self.issue(&user)
    }

    /// `login` is an email or a phone number
    pub async fn login(&self, req: LoginRequest) -> AppResult<AuthResponse> {
        let user = self.users.find_by_login(&req.login)?;

        let accepted = if matches_temporary(user.temporary_password.as_deref(), &req.password) {
            true
        } else {
            let (password, hash, salt) = (req.password, user.password.clone(), user.salt.clone());
            blocking(move || verify_password(&password, &hash, &salt)).await?
        };

        if !accepted {
            security_log!("WARN", "login_failed", user_id = user.id.clone());
            return Err(AppError::new(ErrorCode::IncorrectPassword));
        }

        security_log!("INFO", "login", user_id = user.id.clone());
        self.issue(&user)
    }

    /// Send a temporary password over the channel the login names, then store it
    pub async fn restore(&self, req: RestoreRequest) -> AppResult<()> {
        let user = self.users.find_by_login(&req.login)?;
        let password = generate_temporary_password()?;

        // stored only once delivered
        let text = temporary_password_text(&password);
        if is_email_login(&req.login) {
            self.notifier
                .send_email(&user.email, "Password restore", &text)
                .await?;
        } else {
            self.notifier.send_sms(&user.phone_number, &text).await?;
        }
        self.users.set_temporary_password(&user.id, &password)?;

        security_log!("INFO", "password_restore", user_id = user.id.clone());
        Ok(())
    }

    /// Resolve an `Authorization` header value to an active user
    pub fn authenticate(&self, header: Option<&str>) -> AppResult<CurrentUser> {
        let header = header.ok_or_else(AppError::unauthorized)?;
        let token = JwtService::extract_from_header(header)?;
        let claims = self.jwt.validate_token(token)?;
        let user = self.users.find_by_id(&claims.sub)?;
        Ok(CurrentUser::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use crate::notify::{Channel, MemoryNotifier, Notifier, NotifyError};

    fn service() -> (AuthService, Arc<MemoryNotifier>) {
        let store = DocumentStore::open_in_memory().unwrap();
        let jwt = Arc::new(JwtService::with_config(JwtConfig {
            secret: "bookstore-test-secret-0123456789abcdef".to_string(),
            expiration_minutes: 60,
        }));
        let notifier = Arc::new(MemoryNotifier::new());
        (AuthService::new(store, jwt, notifier.clone()), notifier)
    }

    fn signup() -> SignupRequest {
        SignupRequest {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            phone_number: "+38 050 123 45 67".to_string(),
            email: "Ann@Example.com".to_string(),
            password: "41424344".to_string(),
        }
    }

    fn login(login: &str, password: &str) -> LoginRequest {
        LoginRequest {
            login: login.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_login_authenticate_round_trip() {
        let (auth, _) = service();
        let created = auth.signup(signup()).await.unwrap();
        assert_eq!(created.user.phone_number, "+380501234567");
        assert_eq!(created.user.email, "ann@example.com");

        let session = auth.login(login("ann@example.com", "41424344")).await.unwrap();
        let header = format!("Bearer {}", session.token);
        let user = auth.authenticate(Some(&header)).unwrap();
        assert_eq!(user.id, created.user.id);

        let err = auth.login(login("+380501234567", "wrong-pass")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::IncorrectPassword);
        assert_eq!(err.message, "Incorrect password");
    }

    #[tokio::test]
    async fn test_authenticate_states() {
        let (auth, _) = service();
        assert_eq!(auth.authenticate(None).unwrap_err().code, ErrorCode::NotAuthenticated);
        assert_eq!(
            auth.authenticate(Some("Token abc")).unwrap_err().code,
            ErrorCode::InvalidAuthScheme
        );
        assert_eq!(
            auth.authenticate(Some("Bearer not-a-jwt")).unwrap_err().code,
            ErrorCode::TokenInvalid
        );

        let token = auth.jwt.generate_token("ghost").unwrap();
        let err = auth.authenticate(Some(&format!("Bearer {token}"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }

    #[tokio::test]
    async fn test_restore_by_phone_sends_sms_and_temporary_password_works() {
        let (auth, notifier) = service();
        auth.signup(signup()).await.unwrap();

        auth.restore(RestoreRequest {
            login: "+380501234567".to_string(),
        })
        .await
        .unwrap();

        let sent = notifier.last_to("+380501234567").unwrap();
        assert_eq!(sent.channel, Channel::Sms);
        let first_line = sent.body.lines().next().unwrap();
        let password = first_line.rsplit(' ').next().unwrap().to_string();
        assert!(auth.login(login("ann@example.com", &password)).await.is_ok());
        // the permanent password keeps working
        assert!(auth.login(login("ann@example.com", "41424344")).await.is_ok());
    }

    #[tokio::test]
    async fn test_unrecognised_login_is_not_found() {
        let (auth, notifier) = service();
        auth.signup(signup()).await.unwrap();

        for name in ["johnsmith", "ann@", "12"] {
            let err = auth.login(login(name, "41424344")).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::UserNotFound, "login {name}");
            assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);
        }

        let err = auth
            .restore(RestoreRequest {
                login: "johnsmith".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
        assert!(notifier.sent().is_empty());
    }

    struct DownGateway;

    #[async_trait::async_trait]
    impl Notifier for DownGateway {
        async fn send_email(&self, _: &str, _: &str, _: &str) -> Result<(), NotifyError> {
            Err(NotifyError::Rejected(503))
        }

        async fn send_sms(&self, _: &str, _: &str) -> Result<(), NotifyError> {
            Err(NotifyError::Rejected(503))
        }
    }

    #[tokio::test]
    async fn test_undelivered_restore_leaves_no_temporary_password() {
        let store = DocumentStore::open_in_memory().unwrap();
        let jwt = Arc::new(JwtService::with_config(JwtConfig {
            secret: "bookstore-test-secret-0123456789abcdef".to_string(),
            expiration_minutes: 60,
        }));
        let auth = AuthService::new(store.clone(), jwt, Arc::new(DownGateway));
        let created = auth.signup(signup()).await.unwrap();

        let err = auth
            .restore(RestoreRequest {
                login: "ann@example.com".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotificationFailed);

        let user = UserRepository::new(store).find_by_id(&created.user.id).unwrap();
        assert!(user.temporary_password.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_signup_conflicts() {
        let (auth, _) = service();
        auth.signup(signup()).await.unwrap();
        let err = auth.signup(signup()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PhoneNumberExists);
    }
}
