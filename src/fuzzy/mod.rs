//! Fuzzy-logic decision support for the adaptive signal strategy.
//!
//! ```text
//! queue, arrival  -->  [ fuzzify ]  -->  [ 16-rule Mamdani base ]
//!                                              |
//!                                        [ centroid defuzzify ]
//!                                              |
//!                                      extension (0..=6 ticks)
//! ```

mod engine;
mod membership;

pub use engine::extension;
