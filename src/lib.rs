pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod patterns;
pub mod recipes;
pub mod rpc;
pub mod users;
