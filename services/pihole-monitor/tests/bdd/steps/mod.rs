//! BDD step definitions for the Pi-hole monitor

pub mod cycle_steps;
pub mod display_steps;
pub mod lifecycle_steps;
