use serde::{Deserialize, Serialize};

/// Claims of an access token issued by the external identity provider.
/// This service only verifies tokens, it never issues them.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    /// Role name: staff, director, hr or admin
    pub role: String,
    pub exp: usize,
    pub jti: String,
}
