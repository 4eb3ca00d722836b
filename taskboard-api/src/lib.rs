//! # Taskboard API Server Library
//!
//! This library provides the HTTP layer of the Taskboard service: routing,
//! request validation, authentication middleware and error mapping. Storage
//! and auth primitives live in `taskboard-shared`.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration from environment variables
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: JSON, query and path extractors with enveloped rejections
//! - `middleware`: Security headers
//! - `routes`: API route handlers
//! - `validation`: Field-level request validation

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod validation;
