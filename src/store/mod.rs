pub mod memory;

use std::future::Future;

use crate::error::AppError;
use crate::models::user::UserRecord;

pub use memory::MemoryStore;

/// Read access to the `users` collection.
pub trait UserDirectory: Send + Sync {
    /// Point lookup; `Ok(None)` when no document exists under `user_id`.
    fn get_user(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, AppError>> + Send;

    /// Equality query on the `role` field.
    fn find_users_by_role(
        &self,
        role: &str,
    ) -> impl Future<Output = Result<Vec<UserRecord>, AppError>> + Send;
}

/// Directory whose backend is unreachable; every read fails.
#[cfg(test)]
pub(crate) struct UnavailableDirectory;

#[cfg(test)]
impl UserDirectory for UnavailableDirectory {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, AppError> {
        Err(AppError::Store(format!("users/{user_id}: backend unavailable")))
    }

    async fn find_users_by_role(&self, role: &str) -> Result<Vec<UserRecord>, AppError> {
        Err(AppError::Store(format!(
            "users where role == {role}: backend unavailable"
        )))
    }
}
