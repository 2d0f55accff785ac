//! Taskly client library.
//!
//! Holds the [`sync::Reconciler`] -- the client-side owner of one rendered
//! page of tasks and its synchronization with the server -- plus the
//! [`api::TaskApi`] seam it talks through and an HTTP implementation of it.

pub mod api;
pub mod config;
pub mod sync;
