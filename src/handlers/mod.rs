// Public routes (/, /health) need no identity. Everything under /api runs
// behind the JWT middleware, which falls back to the configured default user
// when no bearer token is sent.
pub mod public;

pub mod access;
pub mod comments;
pub mod content;
pub mod families;
pub mod groups;
pub mod kanban;
pub mod notifications;
pub mod progeny;
pub mod timeline;
pub mod users;
