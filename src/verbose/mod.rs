//! # Logging Module
//! 
//! Structured logging system for traffic simulation debugging and monitoring.
//!
//! This module provides hierarchical logging levels and structured event tracking
//! using the `tracing` crate with JSON output format.
//!
//! **Most of time end-developer should not use this module directly, except
//! for setting the global logging level and constructing a [`LocalLogger`].**
//!
//! ## Components
//!
//! - [`VerboseLevel`] - Hierarchical debug levels (None → Main → Additional → Detailed → All)
//! - [`LocalLogger`] - per-run logger, tagged with a session id
//! - Event constants - Predefined event types for simulation phases
//!
//! ## Quick Start
//!
//! ```rust
//! use intersection_sim_core::verbose::{set_verbose_level, VerboseLevel, LocalLogger, EVENT_TICK};
//!
//! set_verbose_level(VerboseLevel::Main);
//! let logger = LocalLogger::with_session(VerboseLevel::Main, "run-1");
//! logger.log(EVENT_TICK, "advancing one tick");
//! ```
//!
//! ## Logging Levels
//!
//! - `None` - No logging
//! - `Main` - Major simulation phases only  
//! - `Additional` - Nested function details
//! - `Detailed` - Loop iterations and fine-grained operations
//! - `All` - Everything (trace level)
//!
//! **Note**: This module may be refactored (completely!) in future versions.
pub mod logger;
pub mod verbose;

pub use self::{logger::LocalLogger, verbose::*};

// Initialize logger when module is loaded
use std::sync::Once;

static INIT: Once = Once::new();

pub fn ensure_logger_init() {
    INIT.call_once(|| {
        init_logger();
    });
}