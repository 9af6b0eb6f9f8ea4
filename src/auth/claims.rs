use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload binding a token to exactly one user identity.
///
/// Validity depends only on the signature and `exp`; whether the account is
/// still active is re-checked against the database on every protected
/// request, never cached in the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // user ID
    pub iat: usize, // issued at (unix timestamp)
    pub exp: usize, // expires at (unix timestamp)
}
