//! Raster acquisition: the asynchronous collaborator behind the stamp brush.
//!
//! The brush itself never blocks: `ensure_loading` schedules work and
//! returns, `try_get` is a non-blocking poll, and a stamp invocation before
//! the raster resolves is an idempotent no-op. [`DecodeCache`] runs the
//! decode on a background worker thread; [`MemoryStore`] is the synchronous
//! implementation for tests and hosts that preload their rasters.

use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use log::{debug, warn};

use super::raster::Raster;

/// Non-blocking raster lookup keyed by a source descriptor (asset id, file
/// path, URL — opaque to the brush).
pub trait RasterStore: Send + Sync {
    /// Poll for a resident raster. Never blocks.
    fn try_get(&self, key: &str) -> Option<Arc<Raster>>;

    /// Schedule loading if the key is neither resident nor already queued.
    /// Returns immediately; repeated calls are no-ops.
    fn ensure_loading(&self, key: &str);
}

/// In-memory store with no loading machinery.
#[derive(Default)]
pub struct MemoryStore {
    rasters: Mutex<HashMap<String, Arc<Raster>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a raster resident under a key.
    pub fn insert(&self, key: &str, raster: Raster) {
        if let Ok(mut map) = self.rasters.lock() {
            map.insert(key.to_string(), Arc::new(raster));
        }
    }
}

impl RasterStore for MemoryStore {
    fn try_get(&self, key: &str) -> Option<Arc<Raster>> {
        self.rasters.lock().ok()?.get(key).cloned()
    }

    fn ensure_loading(&self, _key: &str) {}
}

/// Fetches raw bytes for a key. Runs on the worker thread, so it may block
/// (read a file, hit the network) without stalling strokes.
pub type RasterLoader = Box<dyn Fn(&str) -> Option<Vec<u8>> + Send + 'static>;

/// Background-decoding raster cache.
///
/// Keys are sent to a worker thread over a channel; the worker fetches
/// bytes through the loader, decodes them with `image`, and publishes the
/// raster into the shared map. Dropping the cache closes the channel and
/// ends the worker.
pub struct DecodeCache {
    tx: Sender<String>,
    resident: Arc<Mutex<HashMap<String, Arc<Raster>>>>,
    pending: Arc<Mutex<HashSet<String>>>,
    _worker: thread::JoinHandle<()>,
}

impl DecodeCache {
    pub fn new(loader: RasterLoader) -> Self {
        let (tx, rx) = mpsc::channel::<String>();
        let resident = Arc::new(Mutex::new(HashMap::new()));
        let pending = Arc::new(Mutex::new(HashSet::new()));

        let worker_resident = Arc::clone(&resident);
        let worker_pending = Arc::clone(&pending);
        let worker = thread::spawn(move || {
            Self::worker_loop(rx, loader, worker_resident, worker_pending);
        });

        Self {
            tx,
            resident,
            pending,
            _worker: worker,
        }
    }

    /// Cache that loads keys as paths relative to a root directory.
    pub fn with_file_loader(root: std::path::PathBuf) -> Self {
        Self::new(Box::new(move |key| std::fs::read(root.join(key)).ok()))
    }

    fn worker_loop(
        rx: Receiver<String>,
        loader: RasterLoader,
        resident: Arc<Mutex<HashMap<String, Arc<Raster>>>>,
        pending: Arc<Mutex<HashSet<String>>>,
    ) {
        for key in rx {
            let decoded = loader(&key)
                .and_then(|bytes| image::load_from_memory(&bytes).ok())
                .map(|img| Arc::new(Raster::from_image(&img)));

            match decoded {
                Some(raster) => {
                    if let Ok(mut map) = resident.lock() {
                        map.insert(key.clone(), raster);
                    }
                    debug!("decoded stamp raster '{}'", key);
                }
                None => warn!("failed to load stamp raster '{}'", key),
            }
            if let Ok(mut set) = pending.lock() {
                set.remove(&key);
            }
        }
    }
}

impl RasterStore for DecodeCache {
    fn try_get(&self, key: &str) -> Option<Arc<Raster>> {
        self.resident.lock().ok()?.get(key).cloned()
    }

    fn ensure_loading(&self, key: &str) {
        if let Ok(map) = self.resident.lock() {
            if map.contains_key(key) {
                return;
            }
        }
        if let Ok(mut set) = self.pending.lock() {
            if !set.insert(key.to_string()) {
                return;
            }
        }
        if self.tx.send(key.to_string()).is_err() {
            warn!("raster cache worker is gone, cannot load '{}'", key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.try_get("mountain").is_none());
        store.insert("mountain", Raster::new(1, 1, vec![0.5]));
        let raster = store.try_get("mountain").unwrap();
        assert_eq!(raster.luminance, vec![0.5]);
    }

    #[test]
    fn test_decode_cache_resolves_png() {
        let mut img = image::GrayImage::new(2, 2);
        img.put_pixel(1, 1, image::Luma([255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageLuma8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let cache = DecodeCache::new(Box::new(move |key| {
            (key == "dot.png").then(|| bytes.clone())
        }));

        assert!(cache.try_get("dot.png").is_none());
        cache.ensure_loading("dot.png");

        // Poll until the worker publishes the raster.
        let mut raster = None;
        for _ in 0..100 {
            raster = cache.try_get("dot.png");
            if raster.is_some() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        let raster = raster.expect("worker should decode the png");
        assert_eq!((raster.width, raster.height), (2, 2));
        assert_eq!(raster.luminance[3], 1.0);
    }

    #[test]
    fn test_ensure_loading_deduplicates_requests() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let cache = DecodeCache::new(Box::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            // Undecodable bytes: the key never becomes resident.
            thread::sleep(Duration::from_millis(50));
            Some(vec![1, 2, 3])
        }));

        cache.ensure_loading("same");
        cache.ensure_loading("same");
        cache.ensure_loading("same");
        thread::sleep(Duration::from_millis(200));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.try_get("same").is_none());
    }
}
