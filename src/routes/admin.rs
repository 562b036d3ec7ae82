use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::app_state::AppState;
use crate::models::settings::{CredentialsForm, SettingsView, StorageSettingsForm};
use crate::services::settings_store::SETTINGS_NAMESPACE;

/// GET /api/admin/s3-uploads — the active settings. Stored credentials are
/// echoed back only when they actually came from the persisted store.
pub async fn settings_view(State(state): State<AppState>) -> Json<SettingsView> {
    Json(SettingsView::from(&*state.settings.current()))
}

/// POST /api/admin/s3-uploads/settings — save bucket/host/path/region.
/// Omitted fields are persisted as empty strings, deliberately clearing the
/// stored value rather than leaving it untouched.
pub async fn save_settings(
    State(state): State<AppState>,
    Json(form): Json<StorageSettingsForm>,
) -> Result<Json<&'static str>, (StatusCode, String)> {
    let values = HashMap::from([
        ("bucket".to_string(), form.bucket.unwrap_or_default()),
        ("host".to_string(), form.host.unwrap_or_default()),
        ("path".to_string(), form.path.unwrap_or_default()),
        ("region".to_string(), form.region.unwrap_or_default()),
    ]);
    persist_and_refresh(&state, values).await
}

/// POST /api/admin/s3-uploads/credentials — save the credential pair, same
/// clear-on-omit semantics.
pub async fn save_credentials(
    State(state): State<AppState>,
    Json(form): Json<CredentialsForm>,
) -> Result<Json<&'static str>, (StatusCode, String)> {
    let values = HashMap::from([
        (
            "accessKeyId".to_string(),
            form.access_key_id.unwrap_or_default(),
        ),
        (
            "secretAccessKey".to_string(),
            form.secret_access_key.unwrap_or_default(),
        ),
    ]);
    persist_and_refresh(&state, values).await
}

async fn persist_and_refresh(
    state: &AppState,
    values: HashMap<String, String>,
) -> Result<Json<&'static str>, (StatusCode, String)> {
    state
        .store
        .set_fields(SETTINGS_NAMESPACE, values)
        .await
        .map_err(|err| {
            let message = format!("{} :: {err}", env!("CARGO_PKG_NAME"));
            tracing::error!("{message}");
            (StatusCode::INTERNAL_SERVER_ERROR, message)
        })?;

    // Fire-and-forget reactivation; a failed refresh is logged by the
    // resolver and leaves the prior settings serving.
    let resolver = state.resolver.clone();
    tokio::spawn(async move {
        let _ = resolver.refresh().await;
    });

    Ok(Json("Saved!"))
}
