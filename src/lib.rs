#![deny(unreachable_pub)]
//! Terminal dashboard client for the ADX strategy trading bot
//!
//! Polls the bot's read-only JSON API on a fixed interval and renders the
//! decoded snapshots (status, indicators, performance, risk limits, recent
//! trades) onto a terminal front-end. The crate is split along the seams the
//! dashboard actually has: typed snapshot models, an HTTP client behind the
//! [`client::BotApi`] trait, pure formatters, section renderers over the
//! [`render::Surface`] abstraction, and the refresh orchestrator that ties
//! them to the two timers.

pub mod client;
pub mod config;
pub mod errors;
pub mod format;
pub mod models;
pub mod refresh;
pub mod render;
pub mod term;

pub use client::{ApiClient, BotApi};
pub use config::Settings;
pub use errors::{DashboardError, DashboardResult};
pub use refresh::Refresher;
pub use render::{Card, Surface};
pub use term::TermSurface;
