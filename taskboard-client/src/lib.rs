//! # Taskboard Client
//!
//! Typed HTTP client for the Taskboard API plus page view-models that drive
//! the list, detail and form flows of a front end.
//!
//! ## Module Organization
//!
//! - `client`: Configuration, request plumbing, 401 handling
//! - `session`: Token storage and the current route
//! - `services`: One typed call per endpoint
//! - `pages`: Page state and actions
//! - `error`: Client error type

pub mod client;
pub mod error;
pub mod pages;
pub mod services;
pub mod session;

pub use client::{ApiClient, ClientConfig};
pub use error::{ClientError, ClientResult};
pub use session::{Route, Session};
