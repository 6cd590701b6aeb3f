use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum InterpretError {
    #[error("risk margin {0} must be a finite fraction in [0, 0.5]")]
    InvalidRiskMargin(f64),
}
