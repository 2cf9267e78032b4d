//! User accounts and their profiles.

use serde::{Deserialize, Serialize};

use super::entity::{Reference, StoreEntity, limit_text, require_text};
use super::store_code::StoreCode;
use crate::error::ValidationError;

/// Role of a user in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    /// Administrator.
    #[serde(rename = "ADM")]
    Admin,
    /// Super administrator.
    #[serde(rename = "SADM")]
    SuperAdmin,
    /// Customer.
    #[default]
    #[serde(rename = "CLI")]
    Client,
    /// Staff member.
    #[serde(rename = "STF")]
    Staff,
    /// Goods provider.
    #[serde(rename = "PRV")]
    Provider,
}

impl UserType {
    /// Short code stored for this user type.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Admin => "ADM",
            Self::SuperAdmin => "SADM",
            Self::Client => "CLI",
            Self::Staff => "STF",
            Self::Provider => "PRV",
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for UserType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADM" => Ok(Self::Admin),
            "SADM" => Ok(Self::SuperAdmin),
            "CLI" => Ok(Self::Client),
            "STF" => Ok(Self::Staff),
            "PRV" => Ok(Self::Provider),
            _ => Err(ValidationError::new(
                "user_type",
                format!("'{s}' is not one of ADM, SADM, CLI, STF, PRV"),
            )),
        }
    }
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomUser {
    /// Login name.
    pub username: String,
    /// Normalized e-mail address.
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Role in the store.
    #[serde(default)]
    pub user_type: UserType,
    /// Can access the admin site.
    #[serde(default)]
    pub is_staff: bool,
    /// Has every permission.
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl CustomUser {
    /// Create a regular user.
    ///
    /// # Errors
    ///
    /// Returns an error if the username or e-mail is blank.
    pub fn new(
        username: impl Into<String>,
        email: &str,
        user_type: UserType,
    ) -> Result<Self, ValidationError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(ValidationError::new("username", "The Username must be set"));
        }
        if email.trim().is_empty() {
            return Err(ValidationError::new("email", "The Email must be set"));
        }

        Ok(Self {
            username,
            email: normalize_email(email),
            first_name: String::new(),
            last_name: String::new(),
            user_type,
            is_staff: false,
            is_superuser: false,
            is_active: true,
        })
    }

    /// Create a user with staff and superuser rights.
    ///
    /// # Errors
    ///
    /// Returns an error if the username or e-mail is blank.
    pub fn superuser(username: impl Into<String>, email: &str) -> Result<Self, ValidationError> {
        let mut user = Self::new(username, email, UserType::SuperAdmin)?;
        user.is_staff = true;
        user.is_superuser = true;
        Ok(user)
    }
}

/// Lowercase the domain part of an e-mail address.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

impl StoreEntity for CustomUser {
    const STORE_CODE_PREFIX: &'static str = "USR";
    const TABLE: &'static str = "users";
    const NAME: &'static str = "CustomUser";

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("username", &self.username, 150)?;
        require_text("email", &self.email, 254)?;
        if !self.email.contains('@') {
            return Err(ValidationError::new("email", "Enter a valid email address."));
        }
        limit_text("first_name", &self.first_name, 150)?;
        limit_text("last_name", &self.last_name, 150)
    }

    fn unique_fields(&self) -> Vec<(&'static str, String)> {
        vec![("username", self.username.clone())]
    }
}

/// Extra details attached to a [`CustomUser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Store code of the owning user.
    pub user: StoreCode,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub phone: String,
}

impl UserProfile {
    /// Empty profile for the user with the given store code.
    #[must_use]
    pub const fn for_user(user: StoreCode) -> Self {
        Self {
            user,
            address: String::new(),
            city: String::new(),
            country: String::new(),
            zip_code: String::new(),
            phone: String::new(),
        }
    }
}

impl StoreEntity for UserProfile {
    const STORE_CODE_PREFIX: &'static str = "USRP";
    const TABLE: &'static str = "user_profiles";
    const NAME: &'static str = "UserProfile";

    fn validate(&self) -> Result<(), ValidationError> {
        self.user
            .validate(CustomUser::STORE_CODE_PREFIX)
            .map_err(|e| ValidationError::new("user", e.message))?;
        limit_text("address", &self.address, 100)?;
        limit_text("city", &self.city, 50)?;
        limit_text("country", &self.country, 50)?;
        limit_text("zip_code", &self.zip_code, 6)?;
        limit_text("phone", &self.phone, 15)
    }

    // one profile per user
    fn unique_fields(&self) -> Vec<(&'static str, String)> {
        vec![("user", self.user.to_string())]
    }

    fn references(&self) -> Vec<Reference> {
        vec![Reference {
            field: "user",
            table: CustomUser::TABLE,
            code: self.user.clone(),
        }]
    }
}
