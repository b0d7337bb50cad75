//! BDD step definitions for the transit relay

pub mod relay_steps;
