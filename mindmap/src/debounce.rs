use std::collections::HashMap;
use std::hash::Hash;

/// Drops repeat invocations of the same key inside a fixed window.
///
/// The first call is admitted immediately and starts the window; calls that land
/// inside it are discarded without extending it.
#[derive(Clone, Debug)]
pub struct Debouncer<K> {
    window_ms: f64,
    last: HashMap<K, f64>,
}

impl<K: Eq + Hash> Debouncer<K> {
    pub fn new(window_ms: f64) -> Self {
        Debouncer { window_ms, last: HashMap::new() }
    }

    pub fn admit(&mut self, key: K, now_ms: f64) -> bool {
        if let Some(&t) = self.last.get(&key) {
            if now_ms - t < self.window_ms {
                return false;
            }
        }
        self.last.insert(key, now_ms);
        true
    }

    pub fn reset(&mut self) {
        self.last.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_per_key() {
        let mut d = Debouncer::new(100.0);
        assert!(d.admit("a", 0.0));
        assert!(!d.admit("a", 99.0));
        assert!(d.admit("b", 50.0));
        assert!(d.admit("a", 100.0));
        assert!(!d.admit("a", 150.0));
        d.reset();
        assert!(d.admit("a", 150.0));
    }
}
