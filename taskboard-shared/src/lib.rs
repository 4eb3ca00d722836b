//! # Taskboard Shared Library
//!
//! This crate contains the domain types, storage layer, and authentication
//! primitives used by the Taskboard API server and its clients.
//!
//! ## Module Organization
//!
//! - `models`: Users, projects and tasks, plus their create/update inputs
//! - `repository`: Repository traits and the Postgres / in-process stores
//! - `auth`: Password hashing, JWT tokens, request auth context, policies
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod repository;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
