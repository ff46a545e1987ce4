use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("box count must be greater than 0")]
    InvalidBoxCount,
    #[error("arrival probability must be within [0, 1] (got {0})")]
    InvalidArrivalProbability(f64),
    #[error("operating window must be greater than 0s")]
    InvalidWindow,
    #[error("service mean must be greater than 0s")]
    InvalidServiceMean,
    #[error("service stddev must be finite and non-negative (got {0})")]
    InvalidServiceSpread(f64),
    #[error("service floor must not exceed the service mean")]
    InvalidServiceFloor,
    #[error("max boxes must be greater than 0")]
    InvalidCompareRange,
    #[error("{0}")]
    ConfigIo(String),
    #[error("{0}")]
    ConfigParse(String),
    #[error("unsupported config format '{0}'")]
    UnsupportedConfigFormat(String),
    #[error("{0}")]
    Cli(String),
}

pub type Result<T> = std::result::Result<T, Error>;
