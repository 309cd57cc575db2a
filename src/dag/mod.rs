// src/dag/mod.rs

//! Task graph.
//!
//! - [`graph`] holds the built-in tasks (`compile`, `watch`, `default`), their
//!   aliases, and user-declared composite tasks, and turns a requested task
//!   into a sequential execution plan.

pub mod graph;

pub use graph::{canonical_name, PlannedTask, TaskBody, TaskGraph, COMPILE, DEFAULT, WATCH};
