//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep boundary layers (HTTP/CLI) decoupled from storage details.
//!
//! # Invariants
//! - Services receive their collaborators by injection; no global store.

pub mod feed_service;
pub mod media_service;
pub mod profile_service;
