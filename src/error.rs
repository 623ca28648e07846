use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("capacity must be greater than 0")]
    InvalidCapacity,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
