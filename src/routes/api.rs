//! `/api` routes: login is open, everything under `/students` sits behind the token guard.

use crate::auth::require_token;
use crate::handlers::{
    create_student, delete_student, get_student, list_students, login, search_students,
    update_student,
};
use crate::state::AppState;
use axum::{middleware, routing::get, routing::post, Router};

pub fn api_routes(state: AppState) -> Router {
    let protected = Router::new()
        .route("/students", get(list_students).post(create_student))
        .route("/students/search", get(search_students))
        .route(
            "/students/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    Router::new()
        .route("/login", post(login))
        .merge(protected)
        .with_state(state)
}
