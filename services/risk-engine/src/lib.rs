//! Risk Engine Service
//!
//! Asset risk classification and assessment:
//! - fuzzy classification of assets into Public / Official / Confidential /
//!   Restricted
//! - fuzzy risk identification and mathematical risk analysis
//! - comparison against SVM and decision tree models, with consensus
//! - ensemble classification over pre-trained model artifacts
//! - ISO 27005, NIST SP 800-30, OCTAVE and integrated risk identification
//!
//! Fuzzy stages degrade to documented fallbacks instead of failing, and
//! flag the results they degrade.

pub mod fuzzy;
pub mod classifier;
pub mod identifier;
pub mod analyzer;
pub mod ml;
pub mod consensus;
pub mod metrics;
pub mod comparison;
pub mod ensemble;
pub mod methodology;
pub mod config;
pub mod validator;
pub mod events;
pub mod engine;

pub use engine::{MethodologyReport, PipelineReport, RiskEngine};
