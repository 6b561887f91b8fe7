// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed resources the probe knows about.

pub mod sample;

pub use sample::{sample_postgres, to_dynamic, Postgres, PostgresSpec};
