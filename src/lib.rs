// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Frame-driven core of an interactive 3D site walkthrough.
//!
//! Sitewalk frames whatever site model is loaded, drives scripted vehicles
//! around fixed loops and animates clickable information markers. It owns
//! the per-frame state and hands renderers a serializable snapshot; drawing
//! is left to the host.
//!
//! # Key entry points
//!
//! - [`engine::Engine`] - composition root, ticked once per frame
//! - [`camera::AutoFit`] - one-shot camera framing with a settle countdown
//! - [`traffic::Vehicle`] - per-vehicle phase state machine
//! - [`marker::MarkerSet`] - pulsing markers with reveal toggles
//! - [`options::Options`] and [`scene::layout::SiteLayout`] - TOML
//!   configuration
//!
//! # Frame order
//!
//! Every [`Engine::tick`](engine::Engine::tick) runs autofit, then vehicles,
//! then markers. All updates are infallible; configuration errors surface
//! from [`Engine::new`](engine::Engine::new).

pub mod camera;
pub mod engine;
pub mod error;
pub mod input;
pub mod marker;
pub mod options;
pub mod scene;
pub mod traffic;
pub mod util;

pub use error::SitewalkError;
