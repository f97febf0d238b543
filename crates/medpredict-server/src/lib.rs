//! Medpredict Server - HTTP services for the diagnosis classifiers.
//!
//! Two independent binaries share this crate: `chest-xray-api` (pneumonia
//! detection from uploaded X-rays) and `symptom-api` (disease prediction
//! from symptom lists). Each builds its state once at startup and serves
//! it read-only.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
