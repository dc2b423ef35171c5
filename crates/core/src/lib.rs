//! Medina Core - Shared types library.
//!
//! This crate provides common types used across all Medina components:
//! - `storefront` - Public-facing e-commerce site
//! - `admin` - Internal administration panel
//! - `cli` - Command-line tools for seeding and management
//!
//! # Architecture
//!
//! The core crate contains only types and in-memory state - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, and statuses
//! - [`cart`] - The session cart state container
//! - [`tables`] - Wire rows for the platform's tables

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod tables;
pub mod types;

pub use cart::{Cart, CartLine, CartProduct};
pub use types::*;
