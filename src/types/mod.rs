//! Shared type definitions
//!
//! This module contains the data types used across the crate.

pub mod quote;

pub use quote::{Quote, QuoteId};
