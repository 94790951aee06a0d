//! Core use-case services.
//!
//! # Responsibility
//! - Turn locator-level provider calls into id-based entry APIs.
//! - Keep presentation code decoupled from locators and SQL.

pub mod entry_service;
