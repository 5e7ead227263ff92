//! ipm: Inkdrop package manager
//!
//! Library half of the `ipm` binary, exposed so the commands can be driven
//! with test doubles for the keyring, the terminal and the registry.

pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod launcher;
pub mod package;
pub mod prompt;
pub mod registry;
