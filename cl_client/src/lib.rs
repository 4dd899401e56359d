//! Internal modules for the CareLink console client.
//!
//! This library provides the authenticated API client, command parsing,
//! and configuration used by the cl_client binary.

pub mod api_client;
pub mod commands;
pub mod config;
