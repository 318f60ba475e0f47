use thiserror::Error;

pub type BladeResult<T> = Result<T, BladeError>;

#[derive(Error, Debug)]
pub enum BladeError {
    #[error("Invalid configuration: {what}")]
    InvalidConfiguration { what: &'static str },

    #[error("configuration rejected: {0}")]
    Core(#[from] prop_core::CoreError),

    #[error("geometry envelope failure: {0}")]
    Geometry(#[from] prop_geom::GeomError),

    #[error("numerical solve failure: {0}")]
    Solve(#[from] prop_solve::SolveError),

    #[error("foil construction failure: {0}")]
    Foil(#[from] prop_foil::FoilError),
}
