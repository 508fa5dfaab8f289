// HTTP server modules
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

// Configuration and accounts
pub mod auth;
pub mod config;

// PostgreSQL storage
pub mod db;

// LLM abstraction layer
pub mod llm;

// Farmer services
pub mod advisor;
pub mod chatbot;
pub mod disease;
pub mod price;
pub mod recommendations;
pub mod schemes;
pub mod stories;
