//! ragchat library crate.
//!
//! This library provides the core functionality for ragchat, including:
//! - Multi-conversation chat state and its on-disk snapshot
//! - The question-answering backend client and background dispatcher
//! - Terminal UI components and the event loop

pub mod api;
pub mod app;
pub mod chat;
pub mod config;
pub mod event_loop;
mod handlers;
pub mod logging;
pub mod ui;
pub mod worker;
