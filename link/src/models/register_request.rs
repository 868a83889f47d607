use serde::{Deserialize, Serialize};

/// Merchant self-registration request
///
/// Creates a merchant together with its first admin account. Optional
/// company details go out as empty strings when not provided, matching what
/// the registration endpoint expects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Merchant display name
    pub name: String,
    /// Merchant contact email (falls back to the admin email when blank)
    pub email: String,
    /// Contact phone number
    pub phone: String,
    /// Country
    pub country: String,
    /// City
    pub city: String,
    /// Street address
    pub address: String,
    /// First admin given name
    pub admin_first_name: String,
    /// First admin family name
    pub admin_last_name: String,
    /// First admin login email
    pub admin_email: String,
    /// First admin password
    pub admin_password: String,
}
