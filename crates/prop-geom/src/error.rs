use thiserror::Error;

pub type GeomResult<T> = Result<T, GeomError>;

#[derive(Error, Debug)]
pub enum GeomError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Interpolation knots must be strictly increasing: {what}")]
    NonMonotone { what: &'static str },

    #[error("Query out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },

    #[error("Curve fit failed: {what}")]
    FitFailed { what: &'static str },
}
