use std::{
    num::NonZeroUsize,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::SystemTime,
};

use crate::{
    error::{Error, Result},
    project::ObjectInfo,
    satellite::{Satellite, SystemMetadata},
    universe::Handle,
    Key,
};

#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// object is dropped by the satellite once this time passes
    pub expires: Option<SystemTime>,
    /// fail the commit with `AlreadyExists` instead of replacing a live object
    pub if_not_exists: bool,
}

/// Counts the uploads of one project that are still pending.
#[derive(Debug)]
pub(crate) struct UploadSlots {
    active: Arc<AtomicUsize>,
    limit: Option<NonZeroUsize>,
}

impl UploadSlots {
    pub fn new(limit: Option<NonZeroUsize>) -> Self {
        Self {
            active: Default::default(),
            limit,
        }
    }

    pub fn acquire(&self) -> Result<UploadSlot> {
        let limit = self.limit.map_or(usize::MAX, NonZeroUsize::get);
        self.active
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |active| {
                (active < limit).then_some(active + 1)
            })
            .map_err(|_| Error::TooManyUploads(limit))?;
        Ok(UploadSlot(Arc::clone(&self.active)))
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }
}

/// One pending upload, given back on drop.
#[derive(Debug)]
pub(crate) struct UploadSlot(Arc<AtomicUsize>);

impl Drop for UploadSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Partial upload of a single object. Nothing is visible on the satellite until
/// [`Upload::commit`] succeeds.
pub struct Upload {
    satellite: Arc<Satellite>,
    api_key: String,
    key: Key,
    options: UploadOptions,
    created: SystemTime,
    written: usize,
    // None once committed or aborted
    pending: Option<Vec<u8>>,
    slot: Option<UploadSlot>,
    _handle: Handle,
}

impl Upload {
    pub(crate) fn new(
        satellite: Arc<Satellite>,
        api_key: String,
        key: Key,
        options: UploadOptions,
        slot: UploadSlot,
        handle: Handle,
    ) -> Self {
        Self {
            satellite,
            api_key,
            key,
            options,
            created: SystemTime::now(),
            written: 0,
            pending: Some(Vec::new()),
            slot: Some(slot),
            _handle: handle,
        }
    }

    fn pending(&mut self) -> Result<&mut Vec<u8>> {
        self.satellite.check(&self.api_key)?;
        self.pending
            .as_mut()
            .ok_or(Error::InvalidHandle("upload"))
    }

    /// append `buf` to the object's data stream, returns the number of bytes taken
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.pending()?.extend_from_slice(buf);
        self.written += buf.len();
        Ok(buf.len())
    }

    pub fn commit(&mut self) -> Result<()> {
        let content = std::mem::take(self.pending()?);
        let meta = SystemMetadata {
            created: self.created,
            expires: self.options.expires,
        };
        let committed = self.satellite.commit_object(
            &self.key,
            &content,
            meta,
            !self.options.if_not_exists,
        );
        self.finish();
        committed
    }

    pub fn abort(&mut self) -> Result<()> {
        self.pending()?;
        self.finish();
        tracing::debug!(bucket = %self.key.bucket, key = %self.key.key, "upload aborted");
        Ok(())
    }

    fn finish(&mut self) {
        self.pending = None;
        self.slot = None;
    }

    /// last known information about the uploaded object
    pub fn info(&self) -> ObjectInfo {
        ObjectInfo {
            key: self.key.key.clone(),
            created: self.created,
            expires: self.options.expires,
            content_length: self.written,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_none()
    }
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("key", &self.key)
            .field("written", &self.written)
            .field("finished", &self.is_finished())
            .finish()
    }
}
