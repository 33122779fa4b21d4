//! Application layer: use-case orchestration on top of the domain seams.

pub mod services;
