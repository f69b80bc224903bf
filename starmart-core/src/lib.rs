//! Core data model for the starmart pipeline.
//!
//! This crate provides the fixed table contracts shared by every pipeline
//! stage: raw entity rows as they arrive from the generator, star-schema
//! dimension and fact rows as they are staged and loaded, surrogate-key
//! derivation, and the delimited-text encoding used both for staged files
//! and for the store's COPY protocol.
//!
//! # Design
//!
//! - **Fixed contracts**: column sets are code, not inferred from data
//! - **Strongly typed**: every table is a `Vec` of a concrete row struct
//! - **Nullable is `Option`**: an empty CSV cell is the only NULL encoding

pub mod csv;
pub mod error;
pub mod keys;
pub mod raw;
pub mod schema;
pub mod stage;
pub mod star;

pub use csv::{CsvWriter, Header, Record};
pub use error::{CoreError, Result};
pub use raw::{RawClaim, RawClient, RawDataset, RawExpense, RawPolicy, RawTax};
pub use star::{
    ClientDim, FactClaim, FactExpense, FactPolicy, FactTax, PolicyDim, ProductDim, StarSchema,
    StateDim, TimeDay,
};
