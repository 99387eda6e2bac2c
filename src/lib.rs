//! Embedding surface for the Nudi ASCII ⇄ Unicode Kannada converter.

uniffi::setup_scaffolding!();

pub mod api;
mod trace_init;
