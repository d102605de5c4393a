//! # ToDue Web Server Library
//!
//! This library provides the HTTP layer of the ToDue to-do list service.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder, and session middleware
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
