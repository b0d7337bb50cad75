//! BDD step definitions for the live-data client

pub mod polling_steps;
