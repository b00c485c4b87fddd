//! Core X Storefront client library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused:
//!
//! - [`catalog`] - The fixed product catalog and the pure query engine
//! - [`cart`] - Append-only cart with a display collaborator
//! - [`wishlist`] - Identity-gated wishlist toggling over a pluggable backend
//! - [`chat`] - Assistant session manager, intent interception, snapshot
//!   persistence, and the remote inference gateway client
//! - [`config`] - Environment-driven configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod wishlist;
