//! Weekly accountability service: users post one short update per
//! Monday-start week, publish it, and read the team feed by week.

pub mod api;
pub mod clock;
pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod service;
pub mod week;
