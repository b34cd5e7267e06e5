pub mod api;
pub mod app;
pub mod backend;
pub mod capture;
pub mod cli;
pub mod config;
pub mod global;
pub mod pipeline;
pub mod session;
pub mod transcription;
