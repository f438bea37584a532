use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::types::Timestamp;

/// One contiguous span of note text attributed to a user.
///
/// The span is half-open: `[start_pos, end_pos)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_span"))]
pub struct NoteAuthorshipDto {
    #[validate(length(min = 1))]
    pub user_name: String,
    #[validate(range(min = 0))]
    pub start_pos: i64,
    #[validate(range(min = 0))]
    pub end_pos: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NoteAuthorshipDto {
    /// Number of characters covered by the span.
    pub fn len(&self) -> i64 {
        (self.end_pos - self.start_pos).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn validate_span(dto: &NoteAuthorshipDto) -> Result<(), ValidationError> {
    if dto.end_pos < dto.start_pos {
        let mut err = ValidationError::new("span_order");
        err.message = Some("endPos must not precede startPos".into());
        return Err(err);
    }
    Ok(())
}
