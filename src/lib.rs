pub mod args;
pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod session;
pub mod sirius;
pub mod templates;

#[cfg(test)]
pub mod testing;
