//! Bugs! streaming module for music downloader hosts.
//!
//! The crate has two layers:
//! * [`gateway`] talks to the Bugs! mobile API: login, entitlement, catalog
//!   lookups, search, lyrics and stream resolution
//! * [`module`] adapts it to the host contract in [`host`], keeping the
//!   session in the host's [`store::Settings`]
//!
//! Everything is blocking. A [`module::Bugs`] instance is meant to be driven
//! from one thread at a time.
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate log;

pub mod artwork;
pub mod config;
pub mod credentials;
pub mod date;
pub mod error;
pub mod gateway;
pub mod host;
pub mod http;
pub mod id;
pub mod lyrics;
pub mod module;
pub mod protocol;
pub mod quality;
pub mod session;
pub mod store;
