use std::collections::HashMap;
use std::sync::Mutex;

/// Memoization cache for a single render.
///
/// Keyed by call arguments, filled on first use, and dropped with the
/// render that owns it. This is deliberately not a cross-request cache:
/// there is no expiry and no eviction because nothing outlives one
/// request.
pub struct RenderCache<T> {
    slots: Mutex<HashMap<String, T>>,
}

impl<T: Clone> RenderCache<T> {
    pub fn new() -> Self {
        RenderCache {
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<T> {
        let slots = self.slots.lock().unwrap();
        slots.get(key).cloned()
    }

    pub fn put(&self, key: &str, value: T) -> T {
        let mut slots = self.slots.lock().unwrap();
        slots.insert(key.to_string(), value.clone());
        value
    }
}

impl<T: Clone> Default for RenderCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
