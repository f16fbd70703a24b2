/// Donation, donor and campaign reporting
pub mod aggregate;
/// Basic application code
pub mod app;
/// Application authorization
pub mod auth;
/// REST clients for outside services
pub mod client;
/// Controllers for REST endpoints
pub mod controller;
/// Domain objects
pub mod domain;
/// Outbound email and WhatsApp messaging
pub mod dispatch;
/// Error types shared by every layer
pub mod error;
/// Donor list search and sort
pub mod query;
/// Repositories
pub mod repo;
/// Application settings
pub mod settings;
/// Application telemetry for tracing and logging
pub mod telemetry;
