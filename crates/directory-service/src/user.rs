//! Local user records mirrored from the identity provider.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_core::traits::identity::ExternalUser;
use directory_core::types::{PageRequest, PageResponse};
use directory_database::UserStore;
use directory_entity::user::{NewUser, UpdateUser, User, UserRole, UserStatus};

/// User listing, profile updates and provider synchronisation.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    /// Create a new user service.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Live users, newest first.
    pub async fn list(&self, page: PageRequest) -> AppResult<PageResponse<User>> {
        self.users.list(page.normalized()).await
    }

    /// Get a user by internal id.
    pub async fn get(&self, id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User with ID {id} not found")))
    }

    /// Get a user by provider id.
    pub async fn get_by_external_id(&self, external_id: &str) -> AppResult<User> {
        self.users
            .find_by_external_id(external_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("User with provider ID {external_id} not found"))
            })
    }

    /// Apply a profile update.
    pub async fn update(&self, id: Uuid, update: &UpdateUser) -> AppResult<User> {
        if matches!(&update.email, Some(e) if !e.contains('@')) {
            return Err(AppError::validation("Invalid email format"));
        }
        let user = self.get(id).await?;
        let saved = self.users.save(&user.with_update(update, Utc::now())).await?;
        info!(user_id = %saved.id, "User updated");
        Ok(saved)
    }

    /// Soft-delete a user.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.users.soft_delete(id).await? {
            return Err(AppError::not_found(format!("User with ID {id} not found")));
        }
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Create or refresh the local mirror of a provider user.
    ///
    /// New users take their role from provider metadata (defaulting to
    /// `user`); existing users only change role when metadata names one.
    pub async fn sync_from_provider(&self, external: &ExternalUser) -> AppResult<User> {
        let email = external
            .email
            .clone()
            .ok_or_else(|| AppError::validation("User must have a primary email"))?;

        match self.users.find_by_external_id(&external.id).await? {
            Some(user) => {
                let update = UpdateUser {
                    email: Some(email),
                    first_name: external.first_name.clone(),
                    last_name: external.last_name.clone(),
                    role: external
                        .public_metadata
                        .get("role")
                        .map(|_| UserRole::from_metadata(&external.public_metadata)),
                    profile_image_url: external.image_url.clone(),
                    ..UpdateUser::default()
                };
                let saved = self.users.save(&user.with_update(&update, Utc::now())).await?;
                info!(user_id = %saved.id, external_id = %saved.external_id, "User synced");
                Ok(saved)
            }
            None => {
                let created = self
                    .users
                    .insert(&NewUser {
                        external_id: external.id.clone(),
                        email,
                        first_name: external.first_name.clone(),
                        last_name: external.last_name.clone(),
                        role: UserRole::from_metadata(&external.public_metadata),
                        status: UserStatus::Active,
                        profile_image_url: external.image_url.clone(),
                    })
                    .await?;
                info!(user_id = %created.id, external_id = %created.external_id, "User created");
                Ok(created)
            }
        }
    }

    /// Soft-delete the user mirrored from `external_id`, if any.
    pub async fn remove_by_external_id(&self, external_id: &str) -> AppResult<bool> {
        let Some(user) = self.users.find_by_external_id(external_id).await? else {
            warn!(external_id, "Delete requested for unknown user");
            return Ok(false);
        };
        let removed = self.users.soft_delete(user.id).await?;
        info!(user_id = %user.id, external_id, "User soft-deleted");
        Ok(removed)
    }
}
