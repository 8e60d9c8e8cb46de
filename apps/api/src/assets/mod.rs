// Project image assets: discovery and filtering of originals, enrichment of
// portfolio projects, responsive srcset listings and build-time optimization.

pub mod discovery;
pub mod enrich;
pub mod handlers;
pub mod optimize;
pub mod srcset;
pub mod variants;
