//! Feature flags served by a local AWS AppConfig agent.
//!
//! # Overview
//!
//! A [`ConfigStoreClient`] retrieves configuration documents from the agent over HTTP (or from a
//! built-in fixture when running offline). Each document maps flag keys to [`FlagDefinition`]s: an
//! `enabled` switch, an optional list of `customers` and free-form attributes.
//!
//! [`FlagRepository`] looks flags up in those documents and evaluates them against an
//! [`EvaluationContext`] with [`evaluate`]:
//!
//! | flag | context | customers | result |
//! |---|---|---|---|
//! | missing | any | any | `false` |
//! | disabled | any | any | `false` |
//! | enabled | none | any | `true` |
//! | enabled | some | absent or empty | `true` |
//! | enabled | some | non-empty | `customers` contains the customer id |
//!
//! Nothing is cached: every operation fetches again.
//!
//! # Error Handling
//!
//! Errors are represented by the [`Error`] enum.
//!
//! Flag lookups and listings never fail: an agent that is unreachable or returns garbage looks like
//! an empty configuration. Targeted operations ([`FlagRepository::get_flag`],
//! [`FlagRepository::get_flags`]) return the error, and
//! [`FlagRepository::get_configuration`] returns `None`. The evaluation entry points fail closed,
//! reporting any flag they could not fetch as off.
//!
//! # Logging
//!
//! The crate uses the [`log`](https://docs.rs/log/latest/log/) crate for logging messages, under
//! the `appconfig` target.
//!
//! # HTTP service
//!
//! The [`server`] module exposes the repository over HTTP. The `appconfig-flags` binary wires it
//! to the agent using [`ClientConfig::from_env`] and [`ServerConfig::from_env`].

#![warn(rustdoc::missing_crate_level_docs)]

mod client;
mod config;
mod error;
mod eval;
mod flag;
mod listing;
mod repository;

pub mod server;
pub mod source;

pub use client::ConfigStoreClient;
pub use config::{ClientConfig, ServerConfig};
pub use error::{Error, Result};
pub use eval::evaluate;
pub use flag::{
    AttributeValue, Attributes, ConfigurationDocument, EvaluationContext, Flag, FlagDefinition,
    MultiFlag,
};
pub use listing::flags_from_response;
pub use repository::FlagRepository;
