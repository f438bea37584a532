use axum::extract::Path;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::IntoResponse;

use notewell_core::avatar::generate_avatar;

/// GET /user/{username}/avatar.svg
///
/// Letter avatar for users without a photo. Any name renders, registered
/// or not.
pub async fn user_avatar(Path(username): Path<String>) -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "image/svg+xml"),
            (CACHE_CONTROL, "public, max-age=86400"),
        ],
        generate_avatar(&username),
    )
}
