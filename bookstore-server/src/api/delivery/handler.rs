//! Delivery API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use shared::error::AppResult;
use shared::models::{
    Country, CountryCreate, DeliveryType, DeliveryTypeCreate, DeliveryTypeUpdate, PaymentType,
    PaymentTypeCreate,
};

/// GET /delivery-type
pub async fn list_delivery_types(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<DeliveryType>>> {
    Ok(Json(state.delivery().delivery_types()?))
}

/// GET /delivery-type/{id}
pub async fn get_delivery_type(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeliveryType>> {
    Ok(Json(state.delivery().delivery_type(&id)?))
}

/// POST /delivery-type - countries and payment types must exist
pub async fn create_delivery_type(
    State(state): State<ServerState>,
    Json(payload): Json<DeliveryTypeCreate>,
) -> AppResult<(StatusCode, Json<DeliveryType>)> {
    let delivery_type = state.delivery().create_delivery_type(payload)?;
    Ok((StatusCode::CREATED, Json(delivery_type)))
}

/// PATCH /delivery-type/{id}
pub async fn update_delivery_type(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DeliveryTypeUpdate>,
) -> AppResult<Json<DeliveryType>> {
    Ok(Json(state.delivery().update_delivery_type(&id, payload)?))
}

/// DELETE /delivery-type/{id}
pub async fn delete_delivery_type(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.delivery().delete_delivery_type(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /country
pub async fn list_countries(State(state): State<ServerState>) -> AppResult<Json<Vec<Country>>> {
    Ok(Json(state.delivery().countries()?))
}

/// POST /country
pub async fn create_country(
    State(state): State<ServerState>,
    Json(payload): Json<CountryCreate>,
) -> AppResult<(StatusCode, Json<Country>)> {
    let country = state.delivery().create_country(payload)?;
    Ok((StatusCode::CREATED, Json(country)))
}

/// GET /payment-type
pub async fn list_payment_types(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<PaymentType>>> {
    Ok(Json(state.delivery().payment_types()?))
}

/// POST /payment-type
pub async fn create_payment_type(
    State(state): State<ServerState>,
    Json(payload): Json<PaymentTypeCreate>,
) -> AppResult<(StatusCode, Json<PaymentType>)> {
    let payment_type = state.delivery().create_payment_type(payload)?;
    Ok((StatusCode::CREATED, Json(payment_type)))
}
