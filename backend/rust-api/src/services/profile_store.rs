use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::profile::UserProfile;

/// In-process profile store owned by `AppState`.
///
/// `update` runs the caller's transform while holding the write guard,
/// so concurrent read-modify-write cycles against the same profile
/// serialize instead of losing updates.
#[derive(Debug, Default)]
pub struct ProfileStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, profile: UserProfile) -> Result<(), AppError> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&profile.id) {
            return Err(AppError::conflict(format!(
                "profile {} already exists",
                profile.id
            )));
        }
        profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    pub async fn get(&self, user_id: &str) -> Result<UserProfile, AppError> {
        self.profiles
            .read()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Profile", user_id))
    }

    /// Atomically replaces the stored profile with the transform's output.
    /// The transform sees the current value and must return a full new one;
    /// its errors abort the update and leave the stored value untouched.
    pub async fn update<F>(&self, user_id: &str, apply: F) -> Result<UserProfile, AppError>
    where
        F: FnOnce(&UserProfile) -> Result<UserProfile, AppError>,
    {
        let mut profiles = self.profiles.write().await;
        let current = profiles
            .get(user_id)
            .ok_or_else(|| AppError::not_found("Profile", user_id))?;
        let updated = apply(current)?;
        profiles.insert(user_id.to_owned(), updated.clone());
        Ok(updated)
    }

    pub async fn remove(&self, user_id: &str) -> Result<(), AppError> {
        self.profiles
            .write()
            .await
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Profile", user_id))
    }

    pub async fn count(&self) -> usize {
        self.profiles.read().await.len()
    }
}
