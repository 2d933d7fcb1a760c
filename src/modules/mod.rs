//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the blob storage backends used by the transfer features.

pub mod storage;
