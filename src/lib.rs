pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod screens;
pub mod session;

#[cfg(test)]
pub mod testing;
