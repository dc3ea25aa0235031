pub mod difficulty;
pub mod entity;
pub mod rules;
pub mod vocab;
