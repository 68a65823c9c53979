//! RocketShoes Core - Shared cart types.
//!
//! This crate provides the types shared by every RocketShoes component:
//! - `cart` - Cart store, inventory client, and persistence
//! - `cli` - Command-line front-end for the cart
//!
//! # Architecture
//!
//! The core crate contains only types and their invariants - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, catalog records, and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
