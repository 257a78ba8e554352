use axum::{extract::State, Json};
use varasto_db::repository::lookups::{self, Lookups};

use crate::{error::ApiError, state::AppState};

/// GET /lookups
///
/// Option lists for the product and order forms.
pub async fn list(State(state): State<AppState>) -> Result<Json<Lookups>, ApiError> {
    let lookups = state.with_connection(|db| lookups::all(db)).await?;
    Ok(Json(lookups))
}
