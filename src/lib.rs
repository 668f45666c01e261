pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod gate;
pub mod models;
pub mod session;
pub mod ui;
pub mod views;
