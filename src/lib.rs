//! Core library exports for the tinta blog engine.
//!
//! The `content` module holds the pure derivation core (metadata enrichment
//! and related-post ranking); the remaining modules are the surrounding web
//! application: forms, models, repositories, routes and service layers.

#[cfg(feature = "data")]
pub mod content;
#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "server")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "server")]
pub mod services;
