use crate::error::AppError;
use crate::store::UserDirectory;

/// Device tokens of every user holding `role`, skipping users without one.
pub async fn role_tokens<S: UserDirectory>(store: &S, role: &str) -> Result<Vec<String>, AppError> {
    let users = store.find_users_by_role(role).await?;

    Ok(users
        .iter()
        .filter_map(|user| user.device_token())
        .map(str::to_string)
        .collect())
}

/// Device token of a single user. A missing id, missing document or missing
/// token all resolve to `None`.
pub async fn user_token<S: UserDirectory>(
    store: &S,
    user_id: Option<&str>,
) -> Result<Option<String>, AppError> {
    let Some(user_id) = user_id.filter(|id| !id.is_empty()) else {
        return Ok(None);
    };

    let user = store.get_user(user_id).await?;
    Ok(user.and_then(|user| user.device_token().map(str::to_string)))
}
