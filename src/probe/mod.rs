// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Sending an object through the admission chain and recording the answer.

pub mod detector;
pub mod manifest;
pub mod operation;
pub mod outcome;

pub use detector::Detector;
pub use manifest::{gvk_of, load_manifest};
pub use operation::Operation;
pub use outcome::{Outcome, ProbeReport};
