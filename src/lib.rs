pub mod auth;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod state;
pub mod summary;
pub mod token;
pub mod transactions;
pub mod utils;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Builds the full HTTP surface. Everything except registration and login
/// sits behind the bearer-token middleware.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/add-transaction", post(transactions::add_transaction))
        .route("/all-transactions", get(transactions::all_transactions))
        .route(
            "/transaction/{id}",
            get(transactions::get_transaction)
                .put(transactions::update_transaction)
                .delete(transactions::delete_transaction),
        )
        .route("/summary", get(summary::summary))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_auth));

    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
