use axum::{http::StatusCode, response::IntoResponse, Json};

use pricebook_infra::StoredEvent;

/// Response for a successful command: the aggregate id and how many events it produced.
pub fn committed(
    status: StatusCode,
    id: impl ToString,
    committed: &[StoredEvent],
) -> axum::response::Response {
    (
        status,
        Json(serde_json::json!({
            "id": id.to_string(),
            "events_committed": committed.len(),
        })),
    )
        .into_response()
}
