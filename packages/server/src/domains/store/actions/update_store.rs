//! Update the authenticated store's display profile.

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::domains::store::models::Store;
use crate::domains::store::StoreAuthError;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStoreRequest {
    pub store_name: Option<String>,
    pub store_address: Option<String>,
    pub store_intro: Option<String>,
}

pub async fn update_store(
    deps: &ServerDeps,
    store_id: Uuid,
    req: UpdateStoreRequest,
) -> Result<Store, StoreAuthError> {
    if let Some(name) = &req.store_name {
        if name.trim().is_empty() || name.chars().count() > 100 {
            return Err(StoreAuthError::Validation(
                "store_name must be between 1 and 100 characters".to_string(),
            ));
        }
    }

    let store = deps
        .stores
        .update_profile(store_id, req.store_name, req.store_address, req.store_intro)
        .await?;

    info!("store {} profile updated", store.id);
    Ok(store)
}
