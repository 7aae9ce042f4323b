//! # Taskboard API Server Library
//!
//! Router, handlers and middleware for the Taskboard REST API.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: JSON body extraction with validation
//! - `middleware`: JWT guard, ownership-failure status and security headers
//! - `routes`: API route handlers
//! - `validation`: Field validators shared by request types

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod validation;
