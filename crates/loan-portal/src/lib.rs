//! Domain library for the instant loan approval portal.
//!
//! The portal collects a ten-field loan application, encodes its
//! categorical fields, scores the row with a pre-trained binary
//! classifier, and appends a plaintext audit record of the submission.
//! HTTP wiring, configuration, and telemetry bootstrap live in the
//! `loan-portal-api` service crate.

pub mod applications;
pub mod config;
pub mod error;
pub mod telemetry;
