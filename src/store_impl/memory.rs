use itertools::Itertools;

use crate::{
    error::{ObjectError, Result},
    store_impl::helpers::range_within,
    GetOpt, Key, ObjectMeta, ObjectStore, PutOpt,
};

type Map<K, V> = dashmap::DashMap<K, V>;

/// Object store keeping every object in memory, the storage behind a [`crate::satellite::Satellite`].
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Map<Key, Vec<u8>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Default::default()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn meta(&self, key: &Key) -> Result<ObjectMeta> {
        self.objects
            .get(key)
            .map(|content| ObjectMeta {
                size: content.len(),
            })
            .ok_or_else(|| ObjectError::NotFound.into())
    }

    fn put(&self, key: &Key, value: &[u8], opt: PutOpt) -> Result<()> {
        match opt {
            PutOpt::Create => match self.objects.entry(key.clone()) {
                dashmap::mapref::entry::Entry::Occupied(_) => {
                    return Err(ObjectError::AlreadyExists.into())
                }
                dashmap::mapref::entry::Entry::Vacant(entry) => {
                    entry.insert(value.to_vec());
                }
            },
            PutOpt::ReplaceOrCreate => {
                self.objects.insert(key.clone(), value.to_vec());
            }
        }
        Ok(())
    }

    fn get(&self, key: &Key, buf: &mut [u8], opt: GetOpt) -> Result<()> {
        let content = self.objects.get(key).ok_or(ObjectError::NotFound)?;
        let range = match opt {
            GetOpt::All => 0..content.len(),
            GetOpt::Range(range) => range,
        };
        if !range_within(content.len(), &range) || range.len() != buf.len() {
            return Err(ObjectError::RangeError.into());
        }
        buf.copy_from_slice(&content[range]);
        Ok(())
    }

    fn delete(&self, key: &Key) -> Result<()> {
        self.objects
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| ObjectError::NotFound.into())
    }

    fn list(&self, bucket: &str) -> Result<Vec<String>> {
        Ok(self
            .objects
            .iter()
            .filter(|entry| entry.key().bucket == bucket)
            .map(|entry| entry.key().key.clone())
            .sorted()
            .collect())
    }
}
