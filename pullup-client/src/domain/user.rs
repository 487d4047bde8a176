use pullup_common::domain::Role;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub is_organization: bool,
    pub profile_image_url: Option<String>,
    pub user_type: Role,
}

/// What a successful login or registration hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub role: Role,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub role: Role,
    pub name: String,
    pub email: String,
    pub password: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub profile_image_url: Option<String>,
}
