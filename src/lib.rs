//! adamscore - facial aesthetics measurement and scoring engine
//!
//! Turns a MediaPipe-style facial landmark set into geometric measurements,
//! then into a bounded score report. A narrative LLM backend can supply the
//! commentary; when it is unavailable or replies with unusable text a
//! deterministic rule-based scorer takes over.
//!
//! ```rust,ignore
//! use adamscore::geometry::calculate_all_measurements;
//! use adamscore::landmarks::LandmarkSet;
//! use adamscore::scoring::ScoreSynthesizer;
//!
//! let front = LandmarkSet::from_json(&std::fs::read_to_string("front.json")?)?;
//! let measurements = calculate_all_measurements(&front, None);
//! let result = ScoreSynthesizer::offline().analyze(&measurements);
//! println!("{} ({})", result.score, result.tier);
//! ```

pub mod ai;
pub mod cli;
pub mod config;
pub mod geometry;
pub mod landmarks;
pub mod models;
pub mod reporters;
pub mod scoring;
