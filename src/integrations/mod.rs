//! Integrations with the host operating system

pub mod system;
