//! Shared response envelope for the JSON API.
//!
//! Everything under `/api/v1` answers with a `{ "data": ... }` envelope.
//! The note action endpoints (`/{note}/info`, `/{note}/revision`) keep
//! their bare shapes since browser clients read them directly.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: authors }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
