//! Rate source abstractions and institution implementations.
//!
//! This module contains:
//! - The `RateSource` trait that all sources implement
//! - The opaque `SourcePayload` raw-document wrapper
//! - Concrete source implementations, one per institution
//!
//! # Architecture
//!
//! The source system is designed to be:
//! - **Source-agnostic**: callers never inspect a source's document format
//! - **Extensible**: new institutions are added by implementing `RateSource`
//! - **Poll-once friendly**: a payload fetched once can be reused for every
//!   pair lookup within the same cycle

mod html;
mod traits;

// Source implementations
pub mod nbu;
pub mod oschadbank;
pub mod privatbank;
pub mod ukrgasbank;
pub mod ukrsibbank;

pub use traits::{RateSource, SourcePayload};
