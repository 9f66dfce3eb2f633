//! HTTP API: route table and handlers.

mod health;
mod response;
mod session;
mod stateless;

use crate::app::GatewayState;
use axum::routing::{get, post};
use axum::Router;

/// Build the route table. `legacy_routes` adds the `/bmw/...` and
/// `/mitsubishi/...` paths served by the same handlers.
pub fn build_router(state: GatewayState, legacy_routes: bool) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health))
        .route("/vehicles/session/list", get(session::list_vehicles))
        .route(
            "/vehicles/session/{operation}/{target}",
            post(session::run_command),
        )
        .route("/vehicles/stateless/status", get(stateless::status))
        .route("/vehicles/stateless/{metric}", get(stateless::metric))
        .route(
            "/vehicles/stateless/climate/{state}",
            post(stateless::set_climate),
        )
        .route(
            "/vehicles/stateless/climate-mode/{mode}/{minutes}",
            post(stateless::set_climate_mode),
        );

    if legacy_routes {
        router = router
            .route("/bmw/list", get(session::list_vehicles))
            .route("/bmw/{command}/{vin}", post(session::run_command))
            .route("/mitsubishi/status", get(stateless::status))
            .route("/mitsubishi/{metric}", get(stateless::metric))
            .route("/mitsubishi/aircon/{state}", post(stateless::set_climate))
            .route(
                "/mitsubishi/acmode/{mode}/{minutes}",
                post(stateless::set_climate_mode),
            );
    }

    router.with_state(state)
}
