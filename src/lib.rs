//! Resolve loose platform version patterns into concrete release versions.
//!
//! Patterns such as `1.20.x`, `>=1.19 <1.21` or `1.16.5-fixed` are matched
//! against upstream release catalogs (the Minecraft version manifest and the
//! PaperMC project API) and merged into one descending list per platform.
//!
//! # Modules
//!
//! - [`config`]: defaults and the JSON configuration file
//! - [`input`]: parsing of the platform → patterns mapping
//! - [`platform`]: which catalog backs which platform name
//! - [`version`]: normalization, range matching, catalogs and the resolver

pub mod config;
pub mod input;
pub mod platform;
pub mod version;
