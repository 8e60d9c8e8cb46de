pub mod assets;
pub mod config;
pub mod contact;
pub mod errors;
pub mod models;
pub mod portfolio;
pub mod routes;
pub mod state;
