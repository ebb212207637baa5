//! Delivery configuration routes
//!
//! Delivery types, countries and payment types are readable by anyone and
//! managed by admins.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/delivery-type", get(handler::list_delivery_types))
        .route("/delivery-type/{id}", get(handler::get_delivery_type))
        .route("/country", get(handler::list_countries))
        .route("/payment-type", get(handler::list_payment_types));

    let admin_routes = Router::new()
        .route("/delivery-type", post(handler::create_delivery_type))
        .route(
            "/delivery-type/{id}",
            patch(handler::update_delivery_type).delete(handler::delete_delivery_type),
        )
        .route("/country", post(handler::create_country))
        .route("/payment-type", post(handler::create_payment_type))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(admin_routes)
}
