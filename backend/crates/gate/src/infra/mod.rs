//! Infrastructure Layer
//!
//! Hosted auth provider client and its session cookie format.

pub mod session_cookie;
pub mod supabase;
