use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::SystemTime,
};

use rand::RngCore;

use crate::{
    access::AccessGrant,
    error::{Error, ObjectError, Result},
    prelude::MemoryObjectStore,
    GetOpt, Key, ObjectStore, PutOpt,
};

type Map<K, V> = dashmap::DashMap<K, V>;
type Set<K> = dashmap::DashSet<K>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SystemMetadata {
    pub created: SystemTime,
    pub expires: Option<SystemTime>,
}

impl SystemMetadata {
    fn expired(&self, now: SystemTime) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }
}

/// In-process stand-in for a remote satellite: it authorizes API keys and
/// holds the buckets and objects uploaded through projects.
#[derive(Debug)]
pub struct Satellite {
    address: String,
    running: AtomicBool,
    api_keys: Set<String>,
    buckets: Set<String>,
    store: MemoryObjectStore,
    system: Map<Key, SystemMetadata>,
}

impl Satellite {
    const API_KEY_LEN: usize = 16;

    pub(crate) fn new(address: String) -> Self {
        Self {
            address,
            running: AtomicBool::new(true),
            api_keys: Default::default(),
            buckets: Default::default(),
            store: MemoryObjectStore::new(),
            system: Default::default(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub(crate) fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn create_api_key(&self) -> String {
        let mut raw = [0_u8; Self::API_KEY_LEN];
        rand::thread_rng().fill_bytes(&mut raw);
        let api_key = hex::encode(raw);
        self.api_keys.insert(api_key.clone());
        tracing::debug!(satellite = %self.address, "api key created");
        api_key
    }

    /// returns whether the key was known
    pub fn revoke_api_key(&self, api_key: &str) -> bool {
        let revoked = self.api_keys.remove(api_key).is_some();
        if revoked {
            tracing::debug!(satellite = %self.address, "api key revoked");
        }
        revoked
    }

    pub fn is_authorized(&self, api_key: &str) -> bool {
        self.api_keys.contains(api_key)
    }

    /// grant for a freshly created API key
    pub fn grant(&self, passphrase: &str) -> AccessGrant {
        AccessGrant {
            satellite_address: self.address.clone(),
            api_key: self.create_api_key(),
            passphrase: passphrase.to_owned(),
        }
    }

    /// fails the way a remote call would: unreachable first, then unauthorized
    pub(crate) fn check(&self, api_key: &str) -> Result<()> {
        if !self.is_running() {
            return Err(Error::Dial(self.address.clone()));
        }
        if !self.is_authorized(api_key) {
            return Err(Error::PermissionDenied);
        }
        Ok(())
    }

    pub(crate) fn create_bucket(&self, bucket: &str) -> Result<()> {
        if bucket.is_empty() {
            return Err(Error::InvalidArg("bucket name is empty".into()));
        }
        if !self.buckets.insert(bucket.to_owned()) {
            return Err(ObjectError::BucketAlreadyExists.into());
        }
        Ok(())
    }

    pub(crate) fn has_bucket(&self, bucket: &str) -> bool {
        self.buckets.contains(bucket)
    }

    /// buckets holding only expired objects count as empty
    pub(crate) fn delete_bucket(&self, bucket: &str) -> Result<()> {
        if !self.list_objects(bucket)?.is_empty() {
            return Err(ObjectError::BucketNotEmpty.into());
        }
        self.buckets.remove(bucket);
        Ok(())
    }

    /// metadata of a live object, expired objects are dropped on sight
    fn live_meta(&self, key: &Key, now: SystemTime) -> Option<SystemMetadata> {
        let meta = self.system.get(key).map(|entry| *entry.value())?;
        if !meta.expired(now) {
            return Some(meta);
        }
        if self
            .system
            .remove_if(key, |_, meta| meta.expired(now))
            .is_some()
        {
            let _ = self.store.delete(key);
            tracing::debug!(
                bucket = %key.bucket,
                key = %key.key,
                "expired object removed"
            );
        }
        None
    }

    /// store a finished upload; an existing object under the same key is
    /// replaced unless `overwrite` is false
    pub(crate) fn commit_object(
        &self,
        key: &Key,
        content: &[u8],
        meta: SystemMetadata,
        overwrite: bool,
    ) -> Result<()> {
        if !self.has_bucket(&key.bucket) {
            return Err(ObjectError::BucketNotFound.into());
        }
        self.live_meta(key, SystemTime::now());
        let opt = if overwrite {
            PutOpt::ReplaceOrCreate
        } else {
            PutOpt::Create
        };
        self.store.put(key, content, opt)?;
        self.system.insert(key.clone(), meta);
        tracing::debug!(
            bucket = %key.bucket,
            key = %key.key,
            size = content.len(),
            "object committed"
        );
        Ok(())
    }

    /// metadata and size of a live object, expired objects read as missing
    pub(crate) fn stat_object(&self, key: &Key) -> Result<(SystemMetadata, usize)> {
        if !self.has_bucket(&key.bucket) {
            return Err(ObjectError::BucketNotFound.into());
        }
        let meta = self
            .live_meta(key, SystemTime::now())
            .ok_or(ObjectError::NotFound)?;
        Ok((meta, self.store.meta(key)?.size))
    }

    pub(crate) fn read_object(&self, key: &Key, opt: GetOpt) -> Result<Vec<u8>> {
        self.stat_object(key)?;
        self.store.get_owned(key, opt)
    }

    pub(crate) fn delete_object(&self, key: &Key) -> Result<()> {
        self.stat_object(key)?;
        self.store.delete(key)?;
        self.system.remove(key);
        Ok(())
    }

    pub(crate) fn list_objects(&self, bucket: &str) -> Result<Vec<String>> {
        if !self.has_bucket(bucket) {
            return Err(ObjectError::BucketNotFound.into());
        }
        let now = SystemTime::now();
        Ok(self
            .store
            .list(bucket)?
            .into_iter()
            .filter(|key| {
                self.live_meta(&Key::new(bucket, key.as_str()), now)
                    .is_some()
            })
            .collect())
    }

    #[cfg(test)]
    fn stored_len(&self) -> usize {
        self.system.len()
    }
}
