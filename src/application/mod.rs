//! Application layer - CLI commands, services, and scheduling

pub mod commands;
pub mod scheduler;
pub mod services;
