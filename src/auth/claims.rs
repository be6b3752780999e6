use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload: the owning user plus the standard timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: Uuid, // user ID
    pub iat: i64,       // issued at (unix timestamp)
    pub exp: i64,       // expires at (unix timestamp)
}
