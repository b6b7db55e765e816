pub mod api_connection;
pub mod cli;
pub mod config;
pub mod diet;
pub mod logging;
pub mod recipe;
pub mod recipe_generator;
