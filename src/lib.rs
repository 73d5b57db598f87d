//! # Media Sweeper
//!
//! Analyzes a personal media collection for near-duplicate photos, clusters
//! them into groups, and recommends which item in each group to keep.
//!
//! ## Core Philosophy
//! - **Never auto-delete** - the core only recommends; deletion is a
//!   separate, presentation-driven step
//! - **Perceptual, not byte-level** - duplicates survive recompression and
//!   resizing
//! - **Cancellable** - a scan over tens of thousands of items can be stopped
//!   at any batch boundary
//!
//! ## Architecture
//! The library is split into a core engine (GUI-agnostic) and presentation
//! layers:
//! - `core` - hashing, clustering, selection, and the scan pipeline
//! - `events` - progress stream for any subscriber (CLI, GUI)
//! - `error` - error types

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{Result, SweepError};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
