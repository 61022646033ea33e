//! # homex Core
//!
//! Core library for the homex property recommender.
//!
//! This crate provides the building blocks the similarity layer works on:
//!
//! - [`PropertyRecord`] - One listing with its raw string fields
//! - [`parse`] - The Field Parser: facilities, configuration details, landmark distances
//! - [`TfidfVectorizer`] - 1/2-gram term weighting for facility lists
//! - [`StandardScaler`] - Column standardization
//! - [`Vector`], [`SparseVector`], [`DenseMatrix`] - Feature rows and matrices
//!
//! ## Example
//!
//! ```rust
//! use homex_core::{PropertyRecord, parse::try_parse_price_range};
//!
//! let (low, high) = try_parse_price_range("₹45 L - ₹1.2 Cr").unwrap();
//! assert!((low - 0.45).abs() < 1e-9 && (high - 1.2).abs() < 1e-9);
//!
//! let record = PropertyRecord::new("Sky Heights")
//!     .with_top_facilities("['Gym', 'Swimming Pool']")
//!     .with_location_advantages("{'Cyber City': '4 Km'}");
//! let parsed = record.parse();
//! assert_eq!(parsed.facilities.len(), 2);
//! assert_eq!(parsed.landmarks.get("Cyber City"), Some(4000.0));
//! ```

pub mod error;
pub mod matrix;
pub mod parse;
pub mod record;
pub mod scaler;
pub mod tfidf;
pub mod vector;

/// SIMD-optimized dot products over f64 feature rows
///
/// - AVX2/FMA on x86_64
/// - scalar fallback everywhere else
pub mod simd;

pub use error::{Error, Result};
pub use matrix::DenseMatrix;
pub use parse::{ConfigurationDetail, LandmarkDistances, ParseFailure};
pub use record::{ParsedProperty, PropertyRecord};
pub use scaler::StandardScaler;
pub use tfidf::TfidfVectorizer;
pub use vector::{SparseVector, Vector};
