//! Services that combine repositories with outbound notifications

pub mod auth;
pub mod order;

pub use auth::AuthService;
pub use order::CheckoutService;

use shared::error::{AppError, AppResult};

/// PBKDF2 runs off the async workers
pub(crate) async fn blocking<T: Send + 'static>(
    f: impl FnOnce() -> T + Send + 'static,
) -> AppResult<T> {
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::internal(format!("Worker task failed: {e}")))
}
