//! Dive Schedule - administrative dashboard for a dive shop
//!
//! This library provides:
//! - Daily boat-trip and shore-dive booking tables with selection,
//!   inline creation and bulk delete
//! - Diver/user management (list, search, create, edit)
//! - Login and registration screens
//! - An axum server fronting the remote schedule GraphQL API
//! - Web UI (Dioxus)

// =============================================================================
// Lints - Enforce code quality and consistency
// =============================================================================

// Deny truly dangerous patterns (these will fail the build)
#![deny(unsafe_code)]
#![deny(unused_must_use)]

// Dioxus UI app (WASM client)
pub mod app;

// Form validation shared by every form
pub mod forms;

// UI state machines and rules, testable without a browser
pub mod schedule;
pub mod users;

// Server-only modules (excluded from WASM build)
#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod error;
#[cfg(feature = "server")]
pub mod gateway;
