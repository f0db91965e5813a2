//! WhatsApp boundary: Green API inbound payloads and outbound delivery.

mod client;
mod webhook;

pub use client::GreenApiClient;
pub use webhook::{IncomingMessage, Notification, extract_incoming};
