//! User role management.

use bistro_core::{Email, UserRole};
use bistro_storefront::db::UserRepository;

use super::{CliError, connect};

/// Set the role of the account registered under `email`.
///
/// # Errors
///
/// Returns an error if the email is invalid, no account uses it, or the
/// database is unreachable.
pub async fn set_role(email: &str, role: UserRole) -> Result<(), CliError> {
    let email = Email::parse(email)?;
    let pool = connect().await?;

    let user = UserRepository::new(&pool).set_role(&email, role).await?;
    tracing::info!(user_id = %user.id, email = %user.email, role = %user.role, "Role updated");
    Ok(())
}
