//! # gatelog-server
//!
//! HTTP server library for the gatelog campus library entry/exit tracker.
//!
//! This library provides the API handlers and state management for gatelog.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod api;
pub mod logging;
pub mod state;
