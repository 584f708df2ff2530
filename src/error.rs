use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid handle: {0}")]
    InvalidHandle(&'static str),
    #[error("invalid argument: {0}")]
    InvalidArg(String),
    #[error("access grant: {0}")]
    AccessParse(String),
    #[error("dial satellite {0}: connection refused")]
    Dial(String),
    #[error("permission denied")]
    PermissionDenied,
    #[error("too many concurrent uploads, limit is {0}")]
    TooManyUploads(usize),
    #[error(transparent)]
    Object(#[from] ObjectError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn other(e: impl Into<anyhow::Error>) -> Self {
        Error::Other(e.into())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ObjectError {
    #[error("bucket not found")]
    BucketNotFound,
    #[error("bucket already exists")]
    BucketAlreadyExists,
    #[error("bucket not empty")]
    BucketNotEmpty,
    #[error("object not found")]
    NotFound,
    #[error("object already exists")]
    AlreadyExists,
    #[error("object range out of bounds")]
    RangeError,
}
