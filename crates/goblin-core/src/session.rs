//! Scan session types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interest::Interest;

/// Response to a successful session-creation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanHandshake {
    /// Coordinator-assigned opaque session identifier.
    pub session_id: String,
    /// Interests declared by the coordinator's analysis modules.
    pub interests: Vec<Interest>,
}

/// A registered scan session.
///
/// Immutable once created; a new scan requires a new session. Nothing is
/// persisted across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSession {
    /// Coordinator-assigned opaque identifier.
    pub id: String,
    /// When the session was registered (client clock).
    pub created_at: DateTime<Utc>,
    /// Interests to scan for, in coordinator order.
    pub interests: Vec<Interest>,
}

impl ScanSession {
    /// Build a session from a coordinator handshake.
    pub fn from_handshake(handshake: ScanHandshake) -> Self {
        Self {
            id: handshake.session_id,
            created_at: Utc::now(),
            interests: handshake.interests,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_preserves_interest_order() {
        let handshake = ScanHandshake {
            session_id: "scan-7".into(),
            interests: vec![
                Interest::new("alpha", "*.txt"),
                Interest::new("beta", "*.bin"),
            ],
        };

        let session = ScanSession::from_handshake(handshake);
        assert_eq!(session.id, "scan-7");
        assert_eq!(session.interests[0].tag.as_str(), "alpha");
        assert_eq!(session.interests[1].tag.as_str(), "beta");
    }
}
