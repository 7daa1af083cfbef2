//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use bistro_core::{Email, UserId, UserRole};

use super::user::User;

/// Session-stored user identity.
///
/// Carries the role so the gateway can gate `/admin` without a database
/// round trip, plus the profile fields shown on every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: UserRole,
    pub image_url: Option<String>,
    pub phone: Option<String>,
    pub street_address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            image_url: user.image_url,
            phone: user.phone,
            street_address: user.street_address,
            postal_code: user.postal_code,
            city: user.city,
            country: user.country,
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the serialized cart.
    pub const CART_ITEMS: &str = "cartItems";
}
