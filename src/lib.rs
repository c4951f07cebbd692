// ABOUTME: Library crate for ttyd-bridge exposing the core components and HTTP router

#![allow(missing_docs)]

pub mod cli;
pub mod config;
pub mod cwd;
pub mod environment;
pub mod error;
pub mod events;
pub mod exec;
pub mod git;
pub mod models;
pub mod server;
pub mod tmux;
