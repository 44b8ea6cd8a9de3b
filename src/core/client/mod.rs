//! Monitor API transport: request sender, cancellation and wire DTOs.

pub mod cancel;
pub mod dto;
pub mod monitor_client;
