//! Merchant registration.

use anyhow::Context;
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::info;

use crate::common::is_valid_mobile;
use crate::domains::store::actions::sms_code_key;
use crate::domains::store::models::{NewStore, Store};
use crate::domains::store::StoreAuthError;
use crate::kernel::{CreateAccountError, ServerDeps};

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterStoreRequest {
    pub store_mobile: String,
    pub password: String,
    pub password_confirmation: String,
    pub invite_code: Option<String>,
    pub sms_code: String,
}

/// Register a new store under the mobile. The shop number is derived from
/// the mobile ("SP" + mobile).
pub async fn register(
    deps: &ServerDeps,
    req: RegisterStoreRequest,
) -> Result<Store, StoreAuthError> {
    if !is_valid_mobile(&req.store_mobile) {
        return Err(StoreAuthError::InvalidMobile);
    }
    if req.password.len() < 6 {
        return Err(StoreAuthError::Validation(
            "password must be at least 6 characters".to_string(),
        ));
    }
    if req.password != req.password_confirmation {
        return Err(StoreAuthError::Validation(
            "password confirmation does not match".to_string(),
        ));
    }

    // An issued code must match; registration stays open when no code was
    // issued for the mobile (codes are only issued to registered mobiles).
    if let Some(cached) = deps.cache.get(&sms_code_key(&req.store_mobile)).await? {
        let code_matches: bool = cached.as_bytes().ct_eq(req.sms_code.as_bytes()).into();
        if !code_matches {
            return Err(StoreAuthError::Validation(
                "wrong verification code".to_string(),
            ));
        }
    }

    if deps.stores.mobile_registered(&req.store_mobile).await? {
        return Err(StoreAuthError::AlreadyRegistered);
    }

    let password_hash =
        bcrypt::hash(&req.password, bcrypt::DEFAULT_COST).context("hash password")?;

    let store = deps
        .stores
        .create(NewStore {
            shop_no: format!("SP{}", req.store_mobile),
            store_mobile: req.store_mobile.clone(),
            password_hash,
            invite_code: req.invite_code,
        })
        .await
        .map_err(|err| match err {
            CreateAccountError::Conflict => StoreAuthError::AlreadyRegistered,
            CreateAccountError::Other(err) => {
                tracing::error!(error = %err, "store insert failed");
                StoreAuthError::RegistrationFailed
            }
        })?;

    deps.cache.forget(&sms_code_key(&req.store_mobile)).await?;

    info!("store {} registered for {}", store.id, store.store_mobile);
    Ok(store)
}
