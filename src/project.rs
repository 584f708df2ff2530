use std::{num::NonZeroUsize, sync::Arc, time::SystemTime};

use crate::{
    access::Access,
    error::{Error, ObjectError, Result},
    satellite::Satellite,
    universe::{Handle, HandleId, Universe},
    upload::{Upload, UploadOptions, UploadSlots},
    GetOpt, Key,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub key: String,
    pub created: SystemTime,
    pub expires: Option<SystemTime>,
    pub content_length: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    pub offset: usize,
    /// read to the end of the object when `None`
    pub length: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectConfig {
    /// cap on uploads pending at the same time, unlimited when `None`
    pub maximum_concurrent: Option<NonZeroUsize>,
}

/// Authenticated session with a satellite.
pub struct Project {
    satellite: Arc<Satellite>,
    api_key: String,
    universe: Arc<Universe>,
    uploads: UploadSlots,
    _handle: Handle,
}

impl Project {
    pub(crate) fn new(
        satellite: Arc<Satellite>,
        api_key: String,
        config: &ProjectConfig,
        handle: Handle,
        universe: Arc<Universe>,
    ) -> Self {
        Self {
            satellite,
            api_key,
            universe,
            uploads: UploadSlots::new(config.maximum_concurrent),
            _handle: handle,
        }
    }

    fn session(&self) -> Result<&Satellite> {
        self.satellite.check(&self.api_key)?;
        Ok(self.satellite.as_ref())
    }

    pub fn handle_id(&self) -> HandleId {
        self._handle.id()
    }

    pub fn satellite_address(&self) -> &str {
        self.satellite.address()
    }

    pub fn create_bucket(&self, bucket: &str) -> Result<()> {
        self.session()?.create_bucket(bucket)
    }

    /// create the bucket unless it already exists
    pub fn ensure_bucket(&self, bucket: &str) -> Result<()> {
        let satellite = self.session()?;
        if satellite.has_bucket(bucket) {
            return Ok(());
        }
        satellite.create_bucket(bucket)
    }

    /// # Error
    /// - Object(ObjectError::BucketNotEmpty): the bucket still holds objects.
    pub fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.session()?.delete_bucket(bucket)
    }

    pub fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        options: &UploadOptions,
    ) -> Result<Upload> {
        let satellite = self.session()?;
        if key.is_empty() {
            return Err(Error::InvalidArg("object key is empty".into()));
        }
        if !satellite.has_bucket(bucket) {
            return Err(ObjectError::BucketNotFound.into());
        }
        let slot = self.uploads.acquire()?;
        Ok(Upload::new(
            Arc::clone(&self.satellite),
            self.api_key.clone(),
            Key::new(bucket, key),
            options.clone(),
            slot,
            self.universe.add("upload"),
        ))
    }

    /// uploads neither committed, aborted nor dropped yet
    pub fn pending_uploads(&self) -> usize {
        self.uploads.active()
    }

    pub fn stat_object(&self, bucket: &str, key: &str) -> Result<ObjectInfo> {
        let (meta, content_length) = self
            .session()?
            .stat_object(&Key::new(bucket, key))?;
        Ok(ObjectInfo {
            key: key.to_owned(),
            created: meta.created,
            expires: meta.expires,
            content_length,
        })
    }

    pub fn download_object(
        &self,
        bucket: &str,
        key: &str,
        options: &DownloadOptions,
    ) -> Result<Vec<u8>> {
        let satellite = self.session()?;
        let key = Key::new(bucket, key);
        let opt = match (options.offset, options.length) {
            (0, None) => GetOpt::All,
            (offset, Some(length)) => GetOpt::Range(offset..offset.saturating_add(length)),
            (offset, None) => {
                let (_, size) = satellite.stat_object(&key)?;
                GetOpt::Range(offset..size.max(offset))
            }
        };
        satellite.read_object(&key, opt)
    }

    pub fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.session()?.delete_object(&Key::new(bucket, key))
    }

    /// keys of the live objects in `bucket`, sorted
    pub fn list_objects(&self, bucket: &str) -> Result<Vec<String>> {
        self.session()?.list_objects(bucket)
    }

    /// revoke the API key carried by `access`, the key must belong to this project's satellite
    pub fn revoke_access(&self, access: &Access) -> Result<()> {
        let satellite = self.session()?;
        if access.satellite_address() != satellite.address() {
            return Err(Error::InvalidArg(format!(
                "access is for satellite {}",
                access.satellite_address()
            )));
        }
        if !satellite.revoke_api_key(&access.grant().api_key) {
            return Err(Error::PermissionDenied);
        }
        Ok(())
    }

    /// release the project; the handle is freed even when closing reports an error
    pub fn close(self) -> Result<()> {
        if !self.satellite.is_running() {
            return Err(Error::Dial(self.satellite.address().to_owned()));
        }
        tracing::debug!(address = self.satellite.address(), "project closed");
        Ok(())
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("satellite", &self.satellite.address())
            .field("handle", &self.handle_id())
            .finish()
    }
}
