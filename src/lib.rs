pub mod config;
pub mod credential;
pub mod docker;
pub mod error;
pub mod lifecycle;
pub mod pipeline;
pub mod ports;
pub mod workspace;
