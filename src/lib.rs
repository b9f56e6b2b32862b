//! Bilingual site server for the One Point Star indie hacker hub.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
