//! Types library for the asset risk classification engine
//!
//! This library provides the value objects shared by every scoring stage,
//! keeping inputs validated and outputs serializable for the REST layer
//! that persists them.
//!
//! # Modules
//! - `ids`: Unique identifiers (AssetId, ComparisonId)
//! - `attributes`: The seven normalized asset attributes
//! - `classification`: Government classification categories and results
//! - `risk`: Risk index and mathematical analysis results
//! - `comparison`: Model comparison, consensus and batch records
//! - `assessment`: Multi-methodology risk identification records
//! - `errors`: Error taxonomy

// Public modules
pub mod ids;
pub mod attributes;
pub mod classification;
pub mod risk;
pub mod comparison;
pub mod assessment;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::attributes::*;
    pub use crate::classification::*;
    pub use crate::risk::*;
    pub use crate::comparison::*;
    pub use crate::assessment::*;
    pub use crate::errors::*;
}
