//! Shared types and models for the Weather Dashboard
//!
//! This crate contains the data model and the pure logic shared between the
//! backend proxy, the native dashboard client and the browser (via WASM):
//! forecast normalization, location identity, formatting and the
//! preference/location store.

pub mod format;
pub mod models;
pub mod normalize;
pub mod places;
pub mod store;
pub mod types;
pub mod validation;

pub use format::*;
pub use models::*;
pub use normalize::*;
pub use places::*;
pub use store::*;
pub use types::*;
pub use validation::*;
