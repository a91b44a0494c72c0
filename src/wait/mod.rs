// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Waiting for submitted mutations to settle.
//!
//! Commands build one or more [`Worker`]s (wait for a condition, wait for
//! deletion, tail logs) and submit them to [`race`] with a timeout. The first
//! worker to finish decides the outcome; the rest are cancelled and drained.

pub mod condition;
pub mod delete;
pub mod race;

pub use condition::{condition_worker, until_condition, Readiness};
pub use delete::{delete_worker, until_delete};
pub use race::{race, Worker};
