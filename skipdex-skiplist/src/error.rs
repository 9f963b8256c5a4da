#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
