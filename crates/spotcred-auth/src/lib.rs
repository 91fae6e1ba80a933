pub mod authorize;
pub mod callback;
pub mod config;
pub mod error;
pub mod exchange;
pub mod flow;
pub mod token_response;
