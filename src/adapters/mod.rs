//! Boundary adapters translating external input into agent manager calls

pub mod api_handler;
pub mod health_handler;
