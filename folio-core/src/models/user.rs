// Folio - A flat-file CMS built with Rust
// Copyright (C) 2025 Folio Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::Result;
use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9._%+-]*[a-zA-Z0-9])?@[a-zA-Z0-9]([a-zA-Z0-9.-]*[a-zA-Z0-9])?\.[a-zA-Z]{2,}$")
        .expect("Failed to compile email regex")
});

pub const MIN_PASSWORD_LEN: usize = 8;

/// Editorial role shown in the admin UI.
///
/// Roles are recorded and displayed but route protection only checks for a
/// session, not for a particular role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    #[default]
    Author,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Author => "author",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            "author" => Ok(Role::Author),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub social: SocialLinks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user with secrets stripped, safe to hand to templates and JSON clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
}

/// Input for signup and for admin-side user creation
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Partial update applied by the admin users screen and the profile page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Option<Role>,
    pub profile: Option<UserProfile>,
}

impl User {
    /// Create a new user with a freshly generated id and hashed password
    pub fn new(name: String, email: String, password: &str, role: Role) -> Result<Self> {
        Self::validate_name(&name).map_err(|e| anyhow::anyhow!("Invalid name: {}", e))?;
        Self::validate_email(&email).map_err(|e| anyhow::anyhow!("Invalid email: {}", e))?;

        let password_hash = Self::hash_password(password)?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            email: email.to_lowercase(),
            password_hash,
            avatar_url: None,
            role,
            profile: UserProfile::default(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Build a user from signup or admin input, enforcing the password policy
    pub fn from_new(input: NewUser) -> Result<Self> {
        Self::validate_password(&input.password)
            .map_err(|e| anyhow::anyhow!("Invalid password: {}", e))?;

        let mut user = Self::new(
            input.name,
            input.email,
            &input.password,
            input.role.unwrap_or_default(),
        )?;
        user.avatar_url = input.avatar_url;
        Ok(user)
    }

    /// Hash a password using Argon2
    pub fn hash_password(password: &str) -> Result<String> {
        use argon2::password_hash::rand_core::OsRng;

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();
        Ok(password_hash)
    }

    pub fn set_password(&mut self, password: &str) -> Result<()> {
        self.password_hash = Self::hash_password(password)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Verify a password against the stored hash
    pub fn verify_password(&self, password: &str) -> Result<bool> {
        use argon2::password_hash::{PasswordHash, PasswordVerifier};

        let parsed_hash = PasswordHash::new(&self.password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Apply a partial update. Email uniqueness is checked by the repository.
    pub fn apply(&mut self, update: UserUpdate) -> Result<()> {
        if let Some(name) = update.name {
            Self::validate_name(&name).map_err(|e| anyhow::anyhow!("Invalid name: {}", e))?;
            self.name = name;
        }
        if let Some(email) = update.email {
            Self::validate_email(&email).map_err(|e| anyhow::anyhow!("Invalid email: {}", e))?;
            self.email = email.to_lowercase();
        }
        if let Some(password) = update.password {
            Self::validate_password(&password)
                .map_err(|e| anyhow::anyhow!("Invalid password: {}", e))?;
            self.password_hash = Self::hash_password(&password)?;
        }
        if let Some(avatar_url) = update.avatar_url {
            self.avatar_url = if avatar_url.trim().is_empty() {
                None
            } else {
                Some(avatar_url)
            };
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(profile) = update.profile {
            self.profile = profile;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            avatar_url: self.avatar_url.clone(),
            role: self.role,
            profile: self.profile.clone(),
            created_at: self.created_at,
        }
    }

    pub fn validate_email(email: &str) -> Result<(), String> {
        if email.is_empty() {
            return Err("Email cannot be empty".to_string());
        }

        if email.len() > 255 {
            return Err("Email cannot exceed 255 characters".to_string());
        }

        if !EMAIL_REGEX.is_match(email) {
            return Err("Invalid email format".to_string());
        }

        Ok(())
    }

    pub fn validate_name(name: &str) -> Result<(), String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err("Name cannot be empty".to_string());
        }

        if trimmed.chars().count() > 100 {
            return Err("Name cannot exceed 100 characters".to_string());
        }

        Ok(())
    }

    pub fn validate_password(password: &str) -> Result<(), String> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            ));
        }

        Ok(())
    }

    /// Validate all user fields
    pub fn is_valid(&self) -> Result<(), String> {
        Self::validate_name(&self.name)?;
        Self::validate_email(&self.email)?;

        if self.password_hash.is_empty() {
            return Err("Password hash cannot be empty".to_string());
        }

        Ok(())
    }
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        user.to_public()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(
            "Ada Lovelace".to_string(),
            "Ada@Example.com".to_string(),
            "correct horse",
            Role::Editor,
        )
        .unwrap()
    }

    #[test]
    fn test_new_user() {
        let user = sample_user();

        assert!(Uuid::parse_str(&user.id).is_ok());
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.email, "ada@example.com");
        assert_ne!(user.password_hash, "correct horse");
        assert_eq!(user.role, Role::Editor);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_new_users_get_distinct_ids_and_hashes() {
        let a = sample_user();
        let b = sample_user();

        assert_ne!(a.id, b.id);
        assert_ne!(a.password_hash, b.password_hash);
    }

    #[test]
    fn test_verify_password() {
        let user = sample_user();

        assert!(user.verify_password("correct horse").unwrap());
        assert!(!user.verify_password("wrong horse").unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        let mut user = sample_user();
        user.password_hash = "plaintext".to_string();

        assert!(user.verify_password("plaintext").is_err());
    }

    #[test]
    fn test_from_new_rejects_short_password() {
        let result = User::from_new(NewUser {
            name: "Short".to_string(),
            email: "short@example.com".to_string(),
            password: "abc".to_string(),
            role: None,
            avatar_url: None,
        });

        assert!(result.unwrap_err().to_string().contains("at least 8"));
    }

    #[test]
    fn test_from_new_defaults_to_author() {
        let user = User::from_new(NewUser {
            name: "Writer".to_string(),
            email: "writer@example.com".to_string(),
            password: "long enough".to_string(),
            role: None,
            avatar_url: Some("/uploads/me.png".to_string()),
        })
        .unwrap();

        assert_eq!(user.role, Role::Author);
        assert_eq!(user.avatar_url.as_deref(), Some("/uploads/me.png"));
    }

    #[test]
    fn test_apply_update() {
        let mut user = sample_user();
        let before = user.updated_at;

        user.apply(UserUpdate {
            name: Some("Countess".to_string()),
            password: Some("new password".to_string()),
            avatar_url: Some(" ".to_string()),
            role: Some(Role::Admin),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(user.name, "Countess");
        assert_eq!(user.role, Role::Admin);
        assert!(user.avatar_url.is_none());
        assert!(user.verify_password("new password").unwrap());
        assert!(user.updated_at >= before);
    }

    #[test]
    fn test_apply_rejects_bad_email() {
        let mut user = sample_user();
        let result = user.apply(UserUpdate {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        });

        assert!(result.is_err());
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn test_public_user_has_no_hash() {
        let user = sample_user();
        let json = serde_json::to_value(user.to_public()).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "editor");
    }

    #[test]
    fn test_role_round_trip_through_str() {
        for role in [Role::Admin, Role::Editor, Role::Author] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(User::validate_email("user@example.com").is_ok());
        assert!(User::validate_email("user+tag@example.co.uk").is_ok());
        assert!(User::validate_email("").is_err());
        assert!(User::validate_email("user@").is_err());
        assert!(User::validate_email("user @example.com").is_err());
        assert!(User::validate_email("trailing.dot.@example.com").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(User::validate_name("A").is_ok());
        assert!(User::validate_name("   ").is_err());
        assert!(User::validate_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_deserialize_without_profile_or_role() {
        let json = r#"{
            "id": "1",
            "name": "Legacy",
            "email": "legacy@example.com",
            "password_hash": "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA",
            "avatar_url": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Author);
        assert_eq!(user.profile, UserProfile::default());
    }
}
