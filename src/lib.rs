//! Task tracking server.
//!
//! Task titles may embed macro tokens (`!1`..`!4` for priority,
//! `!before dd.mm.yyyy` for a deadline) that populate structured fields when
//! the client does not send them; see [`title_macros`].

pub mod api;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod service;
pub mod title_macros;
