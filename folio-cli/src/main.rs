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

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use folio_core::models::user::{NewUser, Role, User, UserUpdate};
use folio_db::{init_data_dir, Database};
use folio_web::configuration::defaults::default_data_directory;
use std::io::Write;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio CLI tool for data directory and user management")]
struct Cli {
    /// Data directory holding the JSON collections
    #[arg(long, env = "DATA_DIR", global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default site settings
    Init,

    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        /// Email address
        email: String,
        /// Display name
        name: String,
        /// Role (admin, editor, author)
        #[arg(long, default_value = "author")]
        role: Role,
        /// Password (will prompt if not provided)
        #[arg(long)]
        password: Option<String>,
    },

    /// Change user password
    Password {
        /// Email or user id
        user: String,
        /// New password (will prompt if not provided)
        #[arg(long)]
        password: Option<String>,
    },

    /// List all users
    List,

    /// Delete a user
    Delete {
        /// Email or user id
        user: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let data_dir = cli.data_dir.unwrap_or_else(default_data_directory);

    match cli.command {
        Commands::Init => {
            println!("Initializing data directory at: {}", data_dir);
            let db = init_data_dir(&data_dir).await?;
            init_settings(&db).await?;
            println!("Data directory initialized successfully!");
            Ok(())
        }
        Commands::User { command } => {
            let db = init_data_dir(&data_dir).await?;
            handle_user_command(command, &db).await
        }
    }
}

/// Write the settings file so it can be edited by hand
async fn init_settings(db: &Database) -> Result<()> {
    let settings = db.settings.get().await;
    db.settings
        .save(settings)
        .await
        .context("Failed to write site settings")?;
    Ok(())
}

fn prompt_password(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    rpassword::read_password().context("Failed to read password")
}

async fn handle_user_command(command: UserCommands, db: &Database) -> Result<()> {
    match command {
        UserCommands::Create {
            email,
            name,
            role,
            password,
        } => {
            println!("Creating user: {} ({})", name, email);

            let password = match password {
                Some(pwd) => pwd,
                None => prompt_password("Password: ")?,
            };

            let user = create_user(db, name, email, role, password).await?;
            println!("User created successfully with ID: {}", user.id);
            println!("Role: {}", user.role);
            Ok(())
        }

        UserCommands::Password { user, password } => {
            let found = find_user(db, &user).await?;
            println!("Changing password for: {}", found.email);

            let password = match password {
                Some(pwd) => pwd,
                None => prompt_password("New password: ")?,
            };

            set_password(db, &found.id, password).await?;
            println!("Password changed successfully!");
            Ok(())
        }

        UserCommands::List => {
            let users = db.users.list().await;
            if users.is_empty() {
                println!("No users found.");
            }
            for user in &users {
                println!("{}", format_user(user));
            }
            Ok(())
        }

        UserCommands::Delete { user } => {
            let found = find_user(db, &user).await?;
            db.users.delete(&found.id).await?;
            println!("Deleted user: {}", found.email);
            Ok(())
        }
    }
}

async fn create_user(
    db: &Database,
    name: String,
    email: String,
    role: Role,
    password: String,
) -> Result<User> {
    let user = User::from_new(NewUser {
        name,
        email,
        password,
        role: Some(role),
        avatar_url: None,
    })?;
    db.users.create(user).await
}

async fn set_password(db: &Database, user_id: &str, password: String) -> Result<User> {
    let update = UserUpdate {
        password: Some(password),
        ..Default::default()
    };
    db.users
        .update(user_id, update)
        .await?
        .ok_or_else(|| anyhow::anyhow!("User not found: {}", user_id))
}

/// Look a user up by email first, then by id
async fn find_user(db: &Database, identifier: &str) -> Result<User> {
    if let Some(user) = db.users.find_by_email(identifier).await {
        return Ok(user);
    }
    db.users
        .find_by_id(identifier)
        .await
        .ok_or_else(|| anyhow::anyhow!("User not found: {}", identifier))
}

fn format_user(user: &User) -> String {
    format!(
        "{}  {:<8} {} <{}>",
        user.id,
        user.role.as_str(),
        user.name,
        user.email
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_and_find_user() -> Result<()> {
        let tmp = TempDir::new()?;
        let db = init_data_dir(tmp.path()).await?;

        let user = create_user(
            &db,
            "Ada".to_string(),
            "ada@example.com".to_string(),
            Role::Admin,
            "analytical-engine".to_string(),
        )
        .await?;

        assert_eq!(find_user(&db, "ada@example.com").await?.id, user.id);
        assert_eq!(find_user(&db, &user.id).await?.email, "ada@example.com");
        assert!(find_user(&db, "nobody@example.com").await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_user_enforces_password_policy() -> Result<()> {
        let tmp = TempDir::new()?;
        let db = init_data_dir(tmp.path()).await?;

        let result = create_user(
            &db,
            "Ada".to_string(),
            "ada@example.com".to_string(),
            Role::Author,
            "short".to_string(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(db.users.count().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_password() -> Result<()> {
        let tmp = TempDir::new()?;
        let db = init_data_dir(tmp.path()).await?;
        let user = create_user(
            &db,
            "Ada".to_string(),
            "ada@example.com".to_string(),
            Role::Editor,
            "first-password".to_string(),
        )
        .await?;

        let updated = set_password(&db, &user.id, "second-password".to_string()).await?;

        assert!(updated.verify_password("second-password")?);
        assert!(!updated.verify_password("first-password")?);
        assert!(set_password(&db, "missing", "whatever123".to_string())
            .await
            .is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_init_writes_settings_file() -> Result<()> {
        let tmp = TempDir::new()?;
        let db = init_data_dir(tmp.path()).await?;

        init_settings(&db).await?;

        assert!(tmp.path().join("settings.json").exists());
        Ok(())
    }

    #[test]
    fn test_format_user() {
        let user = User::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "analytical-engine",
            Role::Admin,
        )
        .unwrap();
        let line = format_user(&user);
        assert!(line.starts_with(&user.id));
        assert!(line.contains("admin"));
        assert!(line.ends_with("Ada <ada@example.com>"));
    }
}
