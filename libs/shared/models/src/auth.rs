use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims issued by the external authentication collaborator. `tenant_id` is
/// optional at the wire level so its absence can be reported as an
/// authorization failure rather than a parse failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub tenant_id: Option<Uuid>,
    pub roles: Option<Vec<String>>,
    pub exp: Option<u64>,
    pub iat: Option<u64>,
}

/// Resolved identity attached to every authenticated request. Every storage
/// access below the HTTP layer is scoped by `tenant_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub roles: Vec<String>,
}
