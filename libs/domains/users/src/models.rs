use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// User role within the store
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Role {
    /// Regular shopper
    #[default]
    #[sea_orm(string_value = "CUSTOMER")]
    Customer,
    /// Store administrator
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    /// Store manager
    #[sea_orm(string_value = "MANAGER")]
    Manager,
    /// Content moderator
    #[sea_orm(string_value = "MODERATOR")]
    Moderator,
}

/// User entity
///
/// `username` and `email` are globally unique; the store enforces this
/// with unique constraints and the service pre-checks for friendlier
/// errors.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier, assigned by the store on creation (0 = not yet persisted)
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Opaque secret, never serialized in responses (see [`UserResponse`])
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new user.
///
/// `role` and `is_active` are accepted for wire compatibility but the
/// creation operation always overwrites them with `CUSTOMER` / `true`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool {
    true
}

/// DTO for updating an existing user.
///
/// Overwrites every profile field; the password is not touched by this
/// operation.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

/// DTO for the dedicated password-change operation
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePassword {
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Query parameters for name search
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct NameSearchParams {
    /// Case-insensitive substring matched against first or last name;
    /// blank or absent yields an empty result
    pub name: Option<String>,
}

/// User projection returned by the API; omits the password
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Existence check result for pre-flight email/username probes
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExistsResponse {
    pub exists: bool,
}

impl User {
    /// Create a new user from the CreateUser DTO.
    ///
    /// Caller-supplied `role` and `is_active` are always overwritten, not
    /// merely defaulted; both timestamps are stamped here.
    pub fn new(input: CreateUser) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            username: input.username,
            email: input.email,
            password: input.password,
            first_name: input.first_name,
            last_name: input.last_name,
            phone: input.phone,
            role: Role::Customer,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply updates from UpdateUser DTO, refreshing `updated_at`.
    /// The password is left untouched.
    pub fn apply_update(&mut self, update: UpdateUser) {
        self.username = update.username;
        self.email = update.email;
        self.first_name = update.first_name;
        self.last_name = update.last_name;
        self.phone = update.phone;
        self.role = update.role;
        self.is_active = update.is_active;
        self.updated_at = Utc::now();
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
