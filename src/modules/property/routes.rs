use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::middleware::auth::{require_auth, require_role};
use crate::modules::auth::model::Role;
use crate::AppState;

const LANDLORD_ONLY: &[Role] = &[Role::Landlord];

pub fn property_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let landlord = Router::new()
        .route("/", post(controller::create_property))
        .route("/landlord", get(controller::landlord_properties))
        .route(
            "/landlord/{property_id}",
            patch(controller::update_availability).delete(controller::delete_property),
        )
        .route_layer(from_fn(|req, next| require_role(LANDLORD_ONLY, req, next)));

    let general = Router::new()
        .route("/", get(controller::all_properties))
        .route("/{property_id}", get(controller::get_property));

    landlord
        .merge(general)
        .route_layer(from_fn_with_state(state, require_auth))
}
