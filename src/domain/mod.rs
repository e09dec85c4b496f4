// Domain layer - Metadata model, invariants and edit field definitions

pub mod errors;
pub mod fields;
pub mod model;
pub mod rules;
