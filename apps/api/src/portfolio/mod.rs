// Portfolio document: validation, the in-memory store backed by a JSON file,
// and the read/write handlers.

pub mod handlers;
pub mod store;
pub mod validation;
