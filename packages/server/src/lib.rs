// minimall - mall API core
//
// This crate provides the backend API for a WeChat mini-program mall:
// user account binding, merchant accounts, and coupons. Domain logic
// lives in domains/*, infrastructure ports and adapters in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
