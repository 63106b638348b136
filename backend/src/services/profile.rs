//! Profile service - business logic for user profile management

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repositories::ProfileRepository;
use crate::store::{Document, DocumentStore};
use health_tracker_shared::types::UpdateProfileRequest;
use health_tracker_shared::validation::first_validation_error;
use health_tracker_shared::{UserProfile, ValidationError};
use serde_json::json;
use tracing::info;
use validator::Validate;

fn not_found() -> ApiError {
    ApiError::NotFound("Profile not found".to_string())
}

/// Profile service for user profile operations
pub struct ProfileService;

impl ProfileService {
    /// Create the default profile for a new identity
    ///
    /// Provisioning twice returns the existing profile unchanged.
    pub async fn provision(store: &dyn DocumentStore, auth: &AuthUser) -> Result<UserProfile, ApiError> {
        if let Some(existing) = ProfileRepository::find(store, &auth.owner_id).await? {
            return Ok(existing);
        }

        let profile = UserProfile::with_defaults(auth.email.as_str());
        ProfileRepository::put(store, &auth.owner_id, &profile).await?;

        info!(owner_id = %auth.owner_id, "Profile provisioned");
        Ok(profile)
    }

    pub async fn get(store: &dyn DocumentStore, owner_id: &str) -> Result<UserProfile, ApiError> {
        ProfileRepository::find(store, owner_id)
            .await?
            .ok_or_else(not_found)
    }

    /// Merge the supplied fields into the profile; email is never changed here
    pub async fn update(
        store: &dyn DocumentStore,
        owner_id: &str,
        req: UpdateProfileRequest,
    ) -> Result<UserProfile, ApiError> {
        req.validate().map_err(|e| first_validation_error(&e))?;

        let current = Self::get(store, owner_id).await?;
        if req.is_empty() {
            return Ok(current);
        }

        let patch = Self::build_patch(req)?;
        ProfileRepository::merge(store, owner_id, patch).await?;

        info!(owner_id, "Profile updated");
        Self::get(store, owner_id).await
    }

    fn build_patch(req: UpdateProfileRequest) -> Result<Document, ApiError> {
        let mut patch = Document::new();

        if let Some(username) = req.username {
            let username = username.trim();
            if username.is_empty() {
                return Err(ValidationError::new("username", "Username cannot be empty.").into());
            }
            patch.insert("username".to_string(), json!(username));
        }
        if let Some(avatar_uri) = req.avatar_uri {
            patch.insert("avatarUri".to_string(), json!(avatar_uri));
        }
        if let Some(height_cm) = req.height_cm {
            patch.insert("heightCm".to_string(), json!(height_cm));
        }
        if let Some(gender) = req.gender {
            patch.insert("gender".to_string(), json!(gender));
        }
        if let Some(age) = req.age {
            patch.insert("age".to_string(), json!(age));
        }
        if let Some(allergies) = req.allergies {
            patch.insert("allergies".to_string(), json!(allergies));
        }

        Ok(patch)
    }
}
