use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::QuerySpec;
use crate::error::ListingError;
use crate::listing::ListingRecord;

/// Position of a record in the newest-first scan: its creation timestamp,
/// then its ID. Field order matters: the derived ordering compares
/// `created_at` first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CursorPosition {
    pub created_at: DateTime<Utc>,
    pub id: String,
}

impl CursorPosition {
    pub fn of(record: &ListingRecord) -> Self {
        Self {
            created_at: record.listing.created_at,
            id: record.id.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct CursorPayload {
    /// fingerprint of the spec the cursor was produced under
    spec: String,
    #[serde(flatten)]
    position: CursorPosition,
}

/// Opaque continuation token for a paged scan.
///
/// Encodes the last returned record's position and the filter/sort it was
/// produced under as URL-safe base64 JSON. Callers should treat the token as
/// an uninterpreted string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCursor {
    token: String,
}

impl PageCursor {
    pub(crate) fn encode(spec: &QuerySpec, position: CursorPosition) -> Result<Self, ListingError> {
        let payload = CursorPayload {
            spec: spec.fingerprint(),
            position,
        };
        let json = serde_json::to_vec(&payload)
            .map_err(|e| ListingError::InvalidCursor(e.to_string()))?;
        Ok(Self {
            token: URL_SAFE_NO_PAD.encode(json),
        })
    }

    /// Wrap a token previously obtained from [`PageCursor::as_str`].
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn into_token(self) -> String {
        self.token
    }

    /// Decode the position, checking the cursor belongs to `spec`.
    pub(crate) fn position_for(&self, spec: &QuerySpec) -> Result<CursorPosition, ListingError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(self.token.as_bytes())
            .map_err(|e| ListingError::InvalidCursor(format!("not valid base64: {}", e)))?;
        let payload: CursorPayload = serde_json::from_slice(&bytes)
            .map_err(|e| ListingError::InvalidCursor(format!("malformed payload: {}", e)))?;

        if payload.spec != spec.fingerprint() {
            return Err(ListingError::InvalidCursor(format!(
                "cursor was issued for `{}`, not `{}`",
                payload.spec,
                spec.fingerprint()
            )));
        }

        Ok(payload.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::ListingType;
    use crate::query::{Filter, PageSizes};

    fn position() -> CursorPosition {
        CursorPosition {
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            id: "listing-9".into(),
        }
    }

    #[test]
    fn decodes_for_the_issuing_spec() {
        let spec = QuerySpec::new(Filter::HasOffer(true), PageSizes::default());
        let cursor = PageCursor::encode(&spec, position()).unwrap();

        let reparsed = PageCursor::from_token(cursor.as_str().to_string());
        assert_eq!(reparsed.position_for(&spec).unwrap(), position());
    }

    #[test]
    fn rejects_cursor_from_another_spec() {
        let offers = QuerySpec::new(Filter::HasOffer(true), PageSizes::default());
        let rentals = QuerySpec::new(Filter::ListingType(ListingType::Rent), PageSizes::default());
        let cursor = PageCursor::encode(&offers, position()).unwrap();

        assert!(matches!(
            cursor.position_for(&rentals),
            Err(ListingError::InvalidCursor(_))
        ));
    }

    #[test]
    fn rejects_garbage_tokens() {
        let spec = QuerySpec::new(Filter::HasOffer(true), PageSizes::default());
        for token in ["***", "bm90IGpzb24"] {
            assert!(matches!(
                PageCursor::from_token(token).position_for(&spec),
                Err(ListingError::InvalidCursor(_))
            ));
        }
    }
}
