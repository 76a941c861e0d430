//! Loadmark tags synthetic HTTP load-test traffic with trace context.
//!
//! Every request a tagged client sends carries a fresh W3C
//! `traceparent` plus `trackedtest.*` marker headers, so an
//! observability backend can group the traces of one load run by
//! suite, task, and invocation. The invocation id is minted once per
//! task name (or once per client instance) and stays stable for the
//! life of the process; the trace id is new on every call.
//!
//! The crate is embeddable: a harness builds a [`Tracker`], wraps its
//! HTTP client in a [`TrackedSession`] or its units of work in
//! [`TrackedTask`]s, and sends traffic as usual. The `loadmark` binary
//! adds scenario files and a preflight `probe` command on top.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (probe, init, validate).
//! - [`config`] -- Scenario file loading, data model, and validation.
//! - [`client`] -- Session HTTP client, the [`Dispatch`] seam, and the
//!   tracked wrappers that inject markers per call or per task run.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`track`] -- Identifier minting, the invocation registry, and
//!   marker header construction.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML scenario file support _(enabled by default)_ |
//! | `json` | JSON scenario file support |
//! | `toml` | TOML scenario file support |
//! | `file-backends` | All scenario file formats |
//! | `full` | All features |

#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod client;
pub mod cmd;
pub mod config;
pub mod error;
pub mod logging;
pub mod track;

pub use client::session::Session;
pub use client::task::{TaskRegistrar, TrackedTask};
pub use client::tracked::TrackedSession;
pub use client::Dispatch;
pub use error::LoadmarkError;
pub use track::{InvocationScope, Tracker, TrackingOptions};
