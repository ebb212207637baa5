//! User Repository
//!
//! Users are created together with their cart. Phone number and email are
//! unique among active users and stored in canonical form.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Cart, CartItem, Role, User, UserPublic, UserUpdate};
use shared::query::ListQuery;
use shared::util::{new_id, now_millis};

use super::require_existing;
use crate::auth::password::{PasswordHash, hash_password};
use crate::db::query::paginate;
use crate::db::{DocumentStore, Scope, WriteScope, soft_delete};
use crate::utils::validation::{
    Checks, MAX_NAME_LEN, is_email_login, normalize_email, normalize_phone, validate_password,
    validate_required_text,
};

/// Validated input for a new account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    /// Canonical form, see [`normalize_phone`]
    pub phone_number: String,
    /// Canonical form, see [`normalize_email`]
    pub email: String,
    pub credentials: PasswordHash,
    pub role: Role,
}

fn phone_taken(phone: &str) -> AppError {
    AppError::with_message(
        ErrorCode::PhoneNumberExists,
        format!("Phone number {phone} is already registered"),
    )
    .with_detail("phoneNumber", phone)
}

fn email_taken(email: &str) -> AppError {
    AppError::with_message(
        ErrorCode::EmailExists,
        format!("Email {email} is already registered"),
    )
    .with_detail("email", email)
}

/// Validate names and normalize contacts, collecting every failure
pub fn normalize_contacts(
    first_name: &str,
    last_name: &str,
    phone_number: &str,
    email: &str,
) -> AppResult<(String, String)> {
    let mut checks = Checks::new();
    checks
        .check(validate_required_text(first_name, "firstName", MAX_NAME_LEN))
        .check(validate_required_text(last_name, "lastName", MAX_NAME_LEN));
    checks.finish()?;
    Ok((normalize_phone(phone_number)?, normalize_email(email)?))
}

/// The active user owning `phone` or `email`, if any
pub fn find_by_contacts(scope: &impl Scope, phone: &str, email: &str) -> AppResult<Option<User>> {
    Ok(scope.find_by::<User>(|u| u.phone_number == phone || u.email == email)?)
}

/// Insert a user and its empty cart inside the caller's scope
pub fn provision_user(scope: &mut WriteScope, data: NewUser) -> AppResult<User> {
    if scope
        .find_by::<User>(|u| u.phone_number == data.phone_number)?
        .is_some()
    {
        return Err(phone_taken(&data.phone_number));
    }
    if scope.find_by::<User>(|u| u.email == data.email)?.is_some() {
        return Err(email_taken(&data.email));
    }

    let now = now_millis();
    let user_id = new_id();
    let cart = Cart {
        id: new_id(),
        user: user_id.clone(),
        items: Vec::new(),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    let user = User {
        id: user_id,
        first_name: data.first_name.trim().to_string(),
        last_name: data.last_name.trim().to_string(),
        phone_number: data.phone_number,
        email: data.email,
        password: data.credentials.hash,
        salt: data.credentials.salt,
        role: data.role,
        temporary_password: None,
        cart: cart.id.clone(),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    scope.save(&cart)?;
    scope.save(&user)?;
    Ok(user)
}

#[derive(Clone)]
pub struct UserRepository {
    store: DocumentStore,
}

impl UserRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub fn find_all(&self, query: &ListQuery) -> AppResult<Vec<UserPublic>> {
        let users = self.store.read()?.list::<User>()?;
        Ok(paginate(users, query).iter().map(UserPublic::from).collect())
    }

    /// Full document, credentials included
    pub fn find_by_id(&self, id: &str) -> AppResult<User> {
        self.store
            .read()?
            .find::<User>(id)?
            .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_id(id))
    }

    /// Resolve an email or phone number to an active user
    pub fn find_by_login(&self, login: &str) -> AppResult<User> {
        let not_found = || AppError::new(ErrorCode::UserNotFound).with_detail("login", login);
        let scope = self.store.read()?;
        // stored contacts are canonical, so a login that does not normalise matches nobody
        let found = if is_email_login(login) {
            let Ok(email) = normalize_email(login) else {
                return Err(not_found());
            };
            scope.find_by::<User>(|u| u.email == email)?
        } else {
            let Ok(phone) = normalize_phone(login) else {
                return Err(not_found());
            };
            scope.find_by::<User>(|u| u.phone_number == phone)?
        };
        found.ok_or_else(not_found)
    }

    pub fn create(&self, data: NewUser) -> AppResult<User> {
        let mut scope = self.store.write()?;
        let user = provision_user(&mut scope, data)?;
        scope.commit()?;
        tracing::info!(id = %user.id, role = user.role.as_str(), "User created");
        Ok(user)
    }

    pub fn set_temporary_password(&self, id: &str, password: &str) -> AppResult<()> {
        let mut scope = self.store.write()?;
        let mut user = scope
            .find::<User>(id)?
            .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_id(id))?;
        user.temporary_password = Some(password.to_string());
        user.updated_at = now_millis();
        scope.save(&user)?;
        scope.commit()?;
        Ok(())
    }

    /// Apply a profile patch. `role` is honoured only when `allow_role_change`.
    pub fn update(&self, id: &str, data: UserUpdate, allow_role_change: bool) -> AppResult<User> {
        if data.role.is_some() && !allow_role_change {
            return Err(AppError::new(ErrorCode::AdminRequired));
        }

        let mut checks = Checks::new();
        if let Some(first_name) = &data.first_name {
            checks.check(validate_required_text(first_name, "firstName", MAX_NAME_LEN));
        }
        if let Some(last_name) = &data.last_name {
            checks.check(validate_required_text(last_name, "lastName", MAX_NAME_LEN));
        }
        if let Some(password) = &data.password {
            checks.check(validate_password(password));
        }
        checks.finish()?;
        let phone = data.phone_number.as_deref().map(normalize_phone).transpose()?;
        let email = data.email.as_deref().map(normalize_email).transpose()?;
        let credentials = data.password.as_deref().map(hash_password).transpose()?;

        let mut scope = self.store.write()?;
        let mut user = scope
            .find::<User>(id)?
            .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_id(id))?;

        if let Some(phone) = phone {
            if scope
                .find_by::<User>(|u| u.id != id && u.phone_number == phone)?
                .is_some()
            {
                return Err(phone_taken(&phone));
            }
            user.phone_number = phone;
        }
        if let Some(email) = email {
            if scope
                .find_by::<User>(|u| u.id != id && u.email == email)?
                .is_some()
            {
                return Err(email_taken(&email));
            }
            user.email = email;
        }
        if let Some(first_name) = data.first_name {
            user.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = data.last_name {
            user.last_name = last_name.trim().to_string();
        }
        if let Some(credentials) = credentials {
            user.password = credentials.hash;
            user.salt = credentials.salt;
            user.temporary_password = None;
        }
        if let Some(role) = data.role {
            user.role = role;
        }

        user.updated_at = now_millis();
        scope.save(&user)?;
        scope.commit()?;
        Ok(user)
    }

    /// Tombstone the user, its cart and the cart's items
    pub fn delete(&self, id: &str) -> AppResult<User> {
        let mut scope = self.store.write()?;
        let mut user = require_existing::<User>(&scope, id)
            .map_err(|_| AppError::new(ErrorCode::UserNotFound).with_id(id))?;
        if user.deleted_at.is_some() {
            return Err(AppError::already_removed("User", id));
        }

        if let Some(mut cart) = scope.find::<Cart>(&user.cart)? {
            for item_id in std::mem::take(&mut cart.items) {
                if let Some(mut item) = scope.find::<CartItem>(&item_id)? {
                    soft_delete(&mut scope, &mut item)?;
                }
            }
            soft_delete(&mut scope, &mut cart)?;
        }
        soft_delete(&mut scope, &mut user)?;
        scope.commit()?;

        tracing::info!(id = %id, "User deleted");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;

    fn new_user(phone: &str, email: &str) -> NewUser {
        NewUser {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            phone_number: phone.to_string(),
            email: email.to_string(),
            credentials: hash_password("41424344").unwrap(),
            role: Role::User,
        }
    }

    #[test]
    fn test_create_provisions_cart() {
        let store = DocumentStore::open_in_memory().unwrap();
        let repo = UserRepository::new(store.clone());
        let user = repo.create(new_user("+380501234567", "ann@example.com")).unwrap();

        let cart = store.read().unwrap().require::<Cart>(&user.cart).unwrap();
        assert_eq!(cart.user, user.id);
        assert!(cart.items.is_empty());
    }

    #[test]
    fn test_contacts_are_unique() {
        let store = DocumentStore::open_in_memory().unwrap();
        let repo = UserRepository::new(store);
        repo.create(new_user("+380501234567", "ann@example.com")).unwrap();

        let err = repo.create(new_user("+380501234567", "bob@example.com")).unwrap_err();
        assert_eq!(err.code, ErrorCode::PhoneNumberExists);
        let err = repo.create(new_user("+380509999999", "ann@example.com")).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmailExists);
    }

    #[test]
    fn test_login_by_email_or_phone() {
        let store = DocumentStore::open_in_memory().unwrap();
        let repo = UserRepository::new(store);
        let user = repo.create(new_user("+380501234567", "ann@example.com")).unwrap();

        assert_eq!(repo.find_by_login(" Ann@Example.com").unwrap().id, user.id);
        assert_eq!(repo.find_by_login("0038 (050) 123-45-67").unwrap().id, user.id);
        let err = repo.find_by_login("nobody@example.com").unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }

    #[test]
    fn test_password_change_clears_temporary_password() {
        let store = DocumentStore::open_in_memory().unwrap();
        let repo = UserRepository::new(store);
        let user = repo.create(new_user("+380501234567", "ann@example.com")).unwrap();
        repo.set_temporary_password(&user.id, "abcdef0123456789").unwrap();
        assert!(repo.find_by_id(&user.id).unwrap().temporary_password.is_some());

        let updated = repo
            .update(
                &user.id,
                UserUpdate {
                    password: Some("new-password".to_string()),
                    ..Default::default()
                },
                false,
            )
            .unwrap();
        assert!(updated.temporary_password.is_none());
        assert!(verify_password("new-password", &updated.password, &updated.salt));
    }

    #[test]
    fn test_role_change_needs_permission() {
        let store = DocumentStore::open_in_memory().unwrap();
        let repo = UserRepository::new(store);
        let user = repo.create(new_user("+380501234567", "ann@example.com")).unwrap();
        let patch = UserUpdate {
            role: Some(Role::Admin),
            ..Default::default()
        };

        let err = repo.update(&user.id, patch.clone(), false).unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminRequired);
        assert_eq!(repo.update(&user.id, patch, true).unwrap().role, Role::Admin);
    }

    #[test]
    fn test_delete_frees_contacts() {
        let store = DocumentStore::open_in_memory().unwrap();
        let repo = UserRepository::new(store);
        let user = repo.create(new_user("+380501234567", "ann@example.com")).unwrap();
        repo.delete(&user.id).unwrap();

        assert_eq!(
            repo.find_by_id(&user.id).unwrap_err().code,
            ErrorCode::UserNotFound
        );
        assert!(repo.create(new_user("+380501234567", "ann@example.com")).is_ok());
        assert_eq!(repo.delete(&user.id).unwrap_err().code, ErrorCode::AlreadyRemoved);
    }
}
