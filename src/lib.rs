//! Library crate for usermgmt-portal.
//!
//! This crate exposes the building blocks of the TUI:
//! - Domain types (`model`) and form validation rules (`validate`)
//! - Form state controllers (`form`) and list filtering/paging (`search`)
//! - The HTTP gateway to the portal API (`api`) and error types (`error`)
//! - Session persistence (`session`) and notifications (`notify`)
//! - Application state, event loop and config files (`app`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `usermgmt-portal` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod error;
pub mod form;
pub mod model;
pub mod notify;
pub mod search;
pub mod session;
pub mod ui;
pub mod validate;

pub use error::{ApiError, Result};
