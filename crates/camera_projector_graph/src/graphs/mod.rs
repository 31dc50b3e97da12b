// SPDX-License-Identifier: MIT OR Apache-2.0
//! Specialized graphs built on the core framework.

pub mod camera_project;
