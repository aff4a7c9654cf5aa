//! Creation and modification times shared by the stored models.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

/// When a record was created and last changed, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Timestamps {
    /// When the record was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the record was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Timestamps {
    /// Timestamps for a record created right now.
    pub fn now() -> Self {
        let now = OffsetDateTime::now_utc();

        Self {
            created_at: now,
            updated_at: now,
        }
    }

    /// Timestamps for a record that is being saved now but happened at `created_at`.
    pub fn created_at(created_at: OffsetDateTime) -> Self {
        Self {
            created_at,
            updated_at: OffsetDateTime::now_utc(),
        }
    }
}
