// Domain layer - Stream model and normalization policy

pub mod errors;
pub mod model;
pub mod rules;
