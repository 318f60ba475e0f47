use thiserror::Error;

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("geometry query failed: {0}")]
    Geometry(#[from] prop_geom::GeomError),

    #[error("Invalid configuration: {what}")]
    InvalidArg { what: &'static str },
}
