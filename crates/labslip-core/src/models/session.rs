//! Signed-in user info kept alongside the case cache.

use serde::{Deserialize, Serialize};

/// The practitioner session the host app signed in with.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub user_id: Option<i64>,
    pub display_name: Option<String>,
    /// Location new slips are created for
    pub location_id: Option<i64>,
    /// Bearer token for the case API
    pub api_token: Option<String>,
}
