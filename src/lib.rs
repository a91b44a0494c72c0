// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod backoff;
pub mod error;
pub mod logs;
pub mod report;
pub mod store;
pub mod types;
pub mod wait;

#[cfg(test)]
mod test_utils;

pub use error::{Result, VigilError};
