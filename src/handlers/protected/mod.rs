// Protected handlers: each takes an `AuthUser`, so a missing or invalid
// token is rejected with 401 before the handler body runs
pub mod comments;
