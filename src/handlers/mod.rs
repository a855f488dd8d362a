//! Request handlers for the gateway's external surfaces

pub mod push;
pub mod websocket;
