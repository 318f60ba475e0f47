use thiserror::Error;

pub type SolveResult<T> = Result<T, SolveError>;

#[derive(Error, Debug)]
pub enum SolveError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Degenerate kinematics: {what}")]
    DegenerateKinematics { what: &'static str },

    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}
