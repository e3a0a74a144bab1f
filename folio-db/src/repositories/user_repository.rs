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
use folio_core::models::user::{User, UserUpdate};
use std::sync::Arc;

use crate::{collection::Collection, error::StoreError, store::CollectionStore};

pub struct UserRepository {
    users: Collection<User>,
}

impl UserRepository {
    pub async fn open(store: Arc<dyn CollectionStore<User>>) -> Result<Self> {
        let users = Collection::open(store)
            .await
            .context("Failed to load users")?;
        Ok(Self { users })
    }

    pub async fn list(&self) -> Vec<User> {
        self.users.list().await
    }

    pub async fn count(&self) -> usize {
        self.users.len().await
    }

    /// Resolve a session's user id to the full record. A missing user is a
    /// normal outcome (deleted after the session was issued).
    pub async fn find_by_id(&self, id: &str) -> Option<User> {
        self.users.find(|u| u.id == id).await
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let email = email.trim().to_lowercase();
        self.users.find(|u| u.email == email).await
    }

    pub async fn create(&self, user: User) -> Result<User> {
        user.is_valid().map_err(StoreError::Validation)?;

        self.users
            .mutate(|users| {
                if users.iter().any(|u| u.email == user.email) {
                    return Err(StoreError::Conflict(format!(
                        "A user with email {} already exists",
                        user.email
                    ))
                    .into());
                }
                if users.iter().any(|u| u.id == user.id) {
                    return Err(
                        StoreError::Conflict(format!("User id {} already exists", user.id)).into(),
                    );
                }
                users.push(user.clone());
                Ok(())
            })
            .await
            .context("Failed to create user")?;

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    /// Apply `update` to the user with `id`. Returns `None` when no such user.
    pub async fn update(&self, id: &str, update: UserUpdate) -> Result<Option<User>> {
        self.users
            .mutate(|users| {
                let Some(index) = users.iter().position(|u| u.id == id) else {
                    return Ok(None);
                };

                let mut user = users[index].clone();
                user.apply(update)
                    .map_err(|e| StoreError::Validation(e.to_string()))?;

                if users.iter().any(|u| u.id != id && u.email == user.email) {
                    return Err(StoreError::Conflict(format!(
                        "A user with email {} already exists",
                        user.email
                    ))
                    .into());
                }

                users[index] = user.clone();
                Ok(Some(user))
            })
            .await
    }

    /// Returns whether a user was removed
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let removed = self
            .users
            .remove(|u| u.id == id)
            .await
            .context("Failed to delete user")?;

        if removed {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(removed)
    }
}
