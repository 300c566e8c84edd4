//! Static export builder for linkpage profiles.
//!
//! Loads profile files from disk and writes one self-contained page per
//! profile, plus a sitemap and robots.txt for the exported tree.

pub mod builder;
pub mod loader;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use loader::{discover_profiles, load_profile, LoadError, ProfileFormat};
