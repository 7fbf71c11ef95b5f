//! trashgang library crate.
//!
//! A multi-user text chat core plus an image-to-text renderer whose output is
//! posted into the chat:
//!
//! - [`chat`] - participant registry, broadcast bus and dispatcher
//! - [`source`] - bounded image acquisition and decoding
//! - [`ascii`] - scaling and luminance-to-character rasterization
//! - [`render`] - request-level composition and spawned render jobs
//! - [`command`] / [`session`] - chat input parsing and per-participant glue

pub mod ascii;
pub mod chat;
pub mod cli;
pub mod command;
pub mod config;
pub mod render;
pub mod session;
pub mod source;
