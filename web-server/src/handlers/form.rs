//! Form & model metadata handlers

use axum::{
    extract::{Query, State},
    Json,
};
use churn_core::api::{FormDescriptor, Layout};
use churn_core::logic::model::ModelMetadata;
use churn_core::logic::record::LayoutInfo;
use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct FormQuery {
    pub layout: Option<String>,
}

/// Form descriptor for the requested (or configured) layout
pub async fn get_form(
    State(state): State<AppState>,
    Query(query): Query<FormQuery>,
) -> AppResult<Json<FormDescriptor>> {
    let layout = match query.layout {
        Some(raw) => raw.parse::<Layout>().map_err(AppError::BadRequest)?,
        None => state.config.layout,
    };
    Ok(Json(FormDescriptor::new(layout)))
}

#[derive(Serialize)]
pub struct ModelResponse {
    pub metadata: ModelMetadata,
    pub explainer: Option<&'static str>,
    pub record_layout: LayoutInfo,
    pub top_k: usize,
}

pub async fn get_model(State(state): State<AppState>) -> Json<ModelResponse> {
    Json(ModelResponse {
        metadata: state.ctx.metadata().clone(),
        explainer: state.ctx.explainer_name(),
        record_layout: LayoutInfo::current(),
        top_k: state.ctx.config().top_k,
    })
}
