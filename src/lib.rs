//! Forum backend library.
//!
//! Users register and log in, publish text or link posts under a fixed set
//! of categories, comment and vote. All state lives in memory behind the
//! thread-safe stores in [`store`]; [`web`] is a thin JSON adapter over them.

pub mod auth;
pub mod config;
pub mod ids;
pub mod store;
pub mod web;
