//! API handlers
//!
//! Author: hephaex@gmail.com

pub mod annotate;
pub mod annotations;
pub mod health;
pub mod vocabulary;
