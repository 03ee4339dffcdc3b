//! FILxCONNECT admin dashboard library.
//!
//! A server-rendered moderation dashboard: staff sign in, browse users,
//! posts and abuse reports fetched from the platform backend, and approve,
//! reject, warn, block or delete from the listing pages.

pub mod auth;
pub mod backend;
pub mod collection;
pub mod components;
pub mod config;
pub mod constants;
pub mod dialog;
pub mod models;
pub mod refresh;
pub mod table;
pub mod views;
pub mod web;
