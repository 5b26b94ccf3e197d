use thiserror::Error;

#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("container failed: {0}")]
    Container(#[from] testcontainers::TestcontainersError),
    #[error("database never accepted connections after {attempts} attempts: {last_error}")]
    NotReady { attempts: u32, last_error: String },
    #[error("applying schema failed: {0}")]
    Schema(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, TestInfraError>;
