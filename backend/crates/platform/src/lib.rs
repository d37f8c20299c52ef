//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Hardened cookie policy and `Set-Cookie` rendering
//! - Deployment mode detection (controls the `Secure` cookie attribute)
//! - The identity header shared by the gate and the handlers behind it

pub mod cookie;
pub mod env;
pub mod identity;
