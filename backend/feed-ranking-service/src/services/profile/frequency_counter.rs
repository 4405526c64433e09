use std::collections::HashMap;
use std::hash::Hash;

/// Counter that remembers when each key was first observed.
///
/// `top(n)` orders by count descending and breaks ties by first-seen order,
/// so the result never depends on hash map iteration order.
#[derive(Debug, Clone)]
pub struct FrequencyCounter<K> {
    entries: HashMap<K, (usize, usize)>, // key -> (count, first_seen)
    observed: usize,
}

impl<K> Default for FrequencyCounter<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            observed: 0,
        }
    }
}

impl<K: Eq + Hash + Clone> FrequencyCounter<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, key: K) {
        let first_seen = self.observed;
        self.entries
            .entry(key)
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, first_seen));
        self.observed += 1;
    }

    pub fn top(&self, n: usize) -> Vec<K> {
        let mut ranked: Vec<(&K, usize, usize)> = self
            .entries
            .iter()
            .map(|(key, (count, first_seen))| (key, *count, *first_seen))
            .collect();

        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked.truncate(n);
        ranked.into_iter().map(|(key, _, _)| key.clone()).collect()
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for FrequencyCounter<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut counter = Self::new();
        for key in iter {
            counter.observe(key);
        }
        counter
    }
}
