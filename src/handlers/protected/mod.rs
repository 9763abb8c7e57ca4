// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every route here sits behind `jwt_auth_middleware`, which injects the
// acting `AuthUser`. Handlers pass that user id into the repositories so
// nothing outside the caller's own bucketlists is ever read or written.

pub mod auth;        // Account endpoints for the authenticated user
pub mod bucketlists; // /bucketlists/ and /bucketlists/:id
pub mod items;       // /bucketlists/:id/items[/:item_id]
