//! brandscout - business brand metadata extraction service.
//!
//! Renders a website in a headless browser and extracts structured brand
//! metadata: business name, description, logo, dominant logo colors, and
//! social profile links. Each request runs one strictly sequential pipeline
//! against its own browser session; nothing is persisted between requests.

pub mod cli;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod server;
