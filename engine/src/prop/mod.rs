//! Prop module: the per-object composition root.
//!
//! # Modules
//!
//! - [`controller`] - [`PropController`] and the [`PropContext`] it acts on

pub mod controller;

pub use controller::{PROP_DAMPING, PropContext, PropController};
