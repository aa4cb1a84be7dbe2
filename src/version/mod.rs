//! Version resolution layer
//!
//! Turns user supplied version patterns into concrete catalog versions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Catalog   │────▶│    Cache    │◀────│  Resolver   │
//! │  (fetch)    │     │ (per run)   │     │ (dispatch)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       │
//!        ▼                                       ▼
//! ┌─────────────┐                         ┌─────────────┐
//! │  Catalogs   │                         │   Matcher   │
//! │(mojang,pmc) │                         │(range/exact)│
//! └─────────────┘                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: run-scoped catalog cache with coalesced fetches
//! - [`catalog`]: `CatalogSource` trait for fetching catalogs
//! - [`catalogs`]: Minecraft manifest and PaperMC project implementations
//! - [`error`]: fatal catalog errors
//! - [`matcher`]: matching one pattern against one catalog
//! - [`normalize`]: coercion of loose version strings to semver
//! - [`range`]: node-semver style range grammar
//! - [`resolver`]: per-platform dispatch, merge and ordering
//! - [`types`]: `Catalog`, warnings and the resolution result

pub mod cache;
pub mod catalog;
pub mod catalogs;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod range;
pub mod resolver;
pub mod types;
