//! Core library for `quickweather`.
//!
//! This crate defines:
//! - The weather client abstraction and its WeatherAPI.com implementation
//! - The lookup state machine consumed by the presentation layer
//! - Configuration & credentials handling
//! - Shared domain models (results, lookup state, errors)
//!
//! It is used by `quickweather-cli`, but any front-end that can render a
//! [`LookupState`] and forward text edits and submits can drive it.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;

pub use client::{WeatherClient, client_from_config, weatherapi::WeatherApiClient};
pub use config::Config;
pub use controller::{Applied, Completion, LookupController, PendingLookup, Ticket};
pub use error::{LookupError, LookupErrorKind};
pub use model::{LookupState, WeatherResult, normalize_query};
