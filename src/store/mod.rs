use indexmap::IndexMap;
use serde::Serialize;

/// A cached asset: the upstream content type plus the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Accounting snapshot of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreReport {
    pub entries: usize,
    pub total_bytes: u64,
    pub budget_bytes: u64,
}

/// Byte-budgeted, least-recently-used blob store backing the asset proxy.
///
/// Map order doubles as recency order: the front is the eviction candidate,
/// the back is the most recently touched entry. The store is plain owned
/// state; the server owns exactly one behind its shared state, and nothing
/// else reaches it.
#[derive(Debug)]
pub struct BlobStore {
    blobs: IndexMap<String, Blob>,
    budget_bytes: u64,
    total_bytes: u64,
}

impl BlobStore {
    pub fn new(budget_bytes: u64) -> Self {
        Self {
            blobs: IndexMap::new(),
            budget_bytes,
            total_bytes: 0,
        }
    }

    /// Stores a blob under an opaque id, evicting least-recently-used
    /// entries until it fits. Returns `false` (and stores nothing) when the
    /// blob alone exceeds the whole budget.
    pub fn store(&mut self, id: &str, content_type: &str, bytes: Vec<u8>) -> bool {
        let size = bytes.len() as u64;
        if size > self.budget_bytes {
            return false;
        }

        self.delete(id);
        while self.total_bytes + size > self.budget_bytes {
            let Some((evicted_id, evicted)) = self.blobs.shift_remove_index(0) else {
                break;
            };
            self.total_bytes -= evicted.bytes.len() as u64;
            tracing::debug!(id = %evicted_id, "evicted blob to reclaim budget");
        }

        self.total_bytes += size;
        self.blobs.insert(
            id.to_string(),
            Blob {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        true
    }

    /// Returns the blob and marks it most recently used.
    pub fn get(&mut self, id: &str) -> Option<&Blob> {
        let blob = self.blobs.shift_remove(id)?;
        self.blobs.insert(id.to_string(), blob);
        self.blobs.get(id)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        match self.blobs.shift_remove(id) {
            Some(blob) => {
                self.total_bytes -= blob.bytes.len() as u64;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.blobs.clear();
        self.total_bytes = 0;
    }

    pub fn report(&self) -> StoreReport {
        StoreReport {
            entries: self.blobs.len(),
            total_bytes: self.total_bytes,
            budget_bytes: self.budget_bytes,
        }
    }
}

#[cfg(test)]
mod tests;
