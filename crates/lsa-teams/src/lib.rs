//! Microsoft Teams incoming-webhook sender.
//!
//! Posts legacy `MessageCard` payloads: a markdown `text` body plus a short
//! `summary` that Teams shows in notifications. Delivery is a single POST with
//! no retries.

mod card;
mod client;

pub mod error;

pub use card::MessageCard;
pub use client::{Notifier, TeamsClient};
pub use error::{Error, Result};
pub use reqwest::StatusCode;
