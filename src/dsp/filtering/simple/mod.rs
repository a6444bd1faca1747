//! Simple one-pole style filters.

pub mod ballistics;
