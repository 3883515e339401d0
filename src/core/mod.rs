//! Core instrument infrastructure
//!
//! Fundamental pieces shared by the rest of the crate. Currently this is the
//! logging abstraction; the samplers and drivers live in their own modules.

pub mod logging;
