// llmhub Control Plane Library
// Decision: Shared library for binaries (API server, export-openapi)

// API routes and types (shared for OpenAPI generation)
pub mod api;

// Authentication module
pub mod auth;

// Server configuration
pub mod config;

// Services layer
pub mod services;
pub use services::RegistryService;

// Storage layer
pub mod storage;

// OpenAPI document generation
pub mod openapi;
