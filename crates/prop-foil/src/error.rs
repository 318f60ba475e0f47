use thiserror::Error;

pub type FoilResult<T> = Result<T, FoilError>;

#[derive(Error, Debug)]
pub enum FoilError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Unknown foil family: {name}")]
    UnknownFamily { name: String },
}
