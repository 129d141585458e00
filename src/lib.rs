//! EventGenie backend - turns an event description into a structured plan
//!
//! A single request asks a chat model for a JSON event plan (theme, food,
//! drinks, activities, entertainment and flyer text), then asks an image model
//! to render the flyer and attaches the resulting image URL.

pub mod ai;
pub mod error;
pub mod models;
pub mod planner;
pub mod prompts;
pub mod server;

pub use error::{Error, Result};
