//! Bookstore server: REST backend for an online book and board game shop
//!
//! # Module layout
//!
//! ```text
//! bookstore-server/src/
//! ├── core/        # config, shared state, server, startup errors
//! ├── db/          # redb document store, references, soft delete, repositories
//! ├── auth/        # JWT, PBKDF2 passwords, auth and role middleware
//! ├── services/    # signup/login/restore, checkout with notifications
//! ├── notify/      # outbound mail and SMS
//! ├── api/         # HTTP handlers, one module per resource
//! ├── routes/      # router assembly and middleware stack
//! ├── middleware/  # request logging
//! └── utils/       # logger, input validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod middleware;
pub mod notify;
pub mod routes;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use routes::{OneshotResult, OneshotRouter, build_app, build_router};
pub use shared::error::{AppError, AppResult, ErrorCode};

pub use utils::logger::init_logger_with_file;

/// Security event under the `security` tracing target
///
/// ```ignore
/// security_log!("WARN", "login_failed", user_id = user.id.clone());
/// ```
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = %$value),*
        );
    };
}

/// Load `.env`, read the configuration and install the logger
pub fn setup_environment() -> core::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env()?;
    std::fs::create_dir_all(config.logs_dir())?;
    init_logger_with_file(
        Some(&config.log_level),
        config.log_json,
        Some(&config.logs_dir()),
    );
    Ok(config)
}
