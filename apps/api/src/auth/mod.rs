// Demo authentication: mock users and tokens, plus email verification codes.
// Credentials are never checked and no session exists server-side.

pub mod codes;
pub mod handlers;
