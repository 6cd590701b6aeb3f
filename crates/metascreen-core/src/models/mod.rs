pub mod diagnostic;
pub mod measurement;
pub mod panel;
pub mod patient;
pub mod probability;
pub mod reference;
pub mod result;
