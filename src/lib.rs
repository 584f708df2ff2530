pub mod access;
pub mod config;
pub mod error;
pub mod helpers;
pub mod project;
pub mod require;
pub mod satellite;
mod store_impl;
pub mod universe;
mod uplink;
pub mod upload;

pub mod prelude {
    pub use super::access::{Access, AccessGrant};
    pub use super::config::TestConfig;
    pub use super::error::Error as UplinkError;
    pub use super::error::ObjectError;
    pub use super::error::Result as UplinkResult;
    pub use super::helpers::{
        array_contains, fill_random_data, with_test_project, with_test_project_echo,
        with_test_project_in,
    };
    pub use super::project::{DownloadOptions, ObjectInfo, Project, ProjectConfig};
    pub use super::require::require_noerror;
    pub use super::requiref;
    pub use super::satellite::Satellite;
    pub use super::store_impl::prelude::*;
    pub use super::uplink::Uplink;
    pub use super::upload::{Upload, UploadOptions};
    pub use super::*;
}

#[derive(Debug, Clone)]
pub struct ObjectMeta {
    pub size: usize,
}

pub type ObjectRange = std::ops::Range<usize>;

/// Location of an object: bucket name plus object key.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Key {
    pub bucket: String,
    pub key: String,
}

impl Key {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum PutOpt {
    /// Create the object if it doesn't exist, fail if it does.
    Create,
    /// Replace the whole object content, create it if it doesn't exist.
    ReplaceOrCreate,
}

#[derive(Debug, Clone)]
pub enum GetOpt {
    /// Get all the content of the object.
    All,
    /// Get a range of the object.
    Range(ObjectRange),
}

pub trait ObjectStore {
    /// # Error
    /// - Object(ObjectError::NotFound): the object doesn't exist.
    fn meta(&self, key: &Key) -> error::Result<ObjectMeta>;
    /// # Error
    /// - Object(ObjectError::AlreadyExists): the object already exists and PutOpt::Create is used.
    fn put(&self, key: &Key, value: &[u8], opt: PutOpt) -> error::Result<()>;
    /// # Error
    /// - Object(ObjectError::NotFound): the object doesn't exist.
    /// - Object(ObjectError::RangeError): the range is out of bounds or doesn't match the buf length.
    fn get(&self, key: &Key, buf: &mut [u8], opt: GetOpt) -> error::Result<()>;
    fn get_owned(&self, key: &Key, opt: GetOpt) -> error::Result<Vec<u8>> {
        let len = match &opt {
            GetOpt::All => self.meta(key)?.size,
            GetOpt::Range(range) => range.end.saturating_sub(range.start),
        };
        let mut buf = vec![0_u8; len];
        self.get(key, &mut buf, opt).map(|_| buf)
    }
    /// # Error
    /// - Object(ObjectError::NotFound): the object doesn't exist.
    fn delete(&self, key: &Key) -> error::Result<()>;
    /// object keys stored under `bucket`, sorted
    fn list(&self, bucket: &str) -> error::Result<Vec<String>>;
}
