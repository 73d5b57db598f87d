//! # Events Module
//!
//! Progress reporting for the scan pipeline.
//!
//! ## Design
//! The core publishes an ordered stream of [`ScanProgress`] states through a
//! channel, allowing any presentation layer (CLI, GUI) to subscribe.
//! Processed counts never decrease within a phase and phases never regress.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = progress_channel();
//!
//! std::thread::spawn(move || {
//!     for state in receiver.iter() {
//!         match state {
//!             ScanProgress::Hashing { processed, total } => {
//!                 println!("Hashed {processed}/{total}")
//!             }
//!             ScanProgress::Completed(result) => {
//!                 println!("{} duplicate groups", result.duplicate_group_count)
//!             }
//!             _ => {}
//!         }
//!     }
//! });
//! ```

mod channel;
mod types;

pub use channel::{null_sender, progress_channel, ProgressReceiver, ProgressSender};
pub use types::{ScanProgress, ScanResult};
