//! Data models for the Clipio asset manager.
//!
//! These models match the frontend TypeScript interfaces exactly for seamless
//! interoperability.

mod asset;
mod collection;

pub use asset::*;
pub use collection::*;
