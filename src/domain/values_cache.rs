// Values cache - candidate members of a rotating filter and the current position
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct ValuesCache {
    idx: usize,
    values: Vec<Value>,
}

impl ValuesCache {
    /// Seed the cache with the filter's current member so rotation has a value
    /// before the candidate list is loaded.
    pub fn seeded(current: Option<Value>) -> Self {
        Self {
            idx: 0,
            values: current.into_iter().collect(),
        }
    }

    /// Replace the candidate values, leaving the index where it is.
    /// An empty list is ignored so a seeded cache never drains.
    pub fn replace_values(&mut self, values: Vec<Value>) -> bool {
        if values.is_empty() {
            return false;
        }
        self.values = values;
        true
    }

    /// Move to the next value, wrapping to the first after the last.
    pub fn advance(&mut self) -> Option<&Value> {
        if self.values.is_empty() {
            return None;
        }
        if self.idx >= self.values.len() - 1 {
            self.idx = 0;
        } else {
            self.idx += 1;
        }
        self.values.get(self.idx)
    }

    pub fn idx(&self) -> usize {
        self.idx
    }

    /// Index of the current value within the list, clamped after a shorter replacement.
    pub fn position(&self) -> usize {
        self.idx.min(self.values.len().saturating_sub(1))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_advance_wraps_around() {
        let mut cache = ValuesCache::seeded(Some(json!("v0")));
        cache.replace_values(vec![json!("v0"), json!("v1"), json!("v2")]);

        assert_eq!(cache.advance(), Some(&json!("v1")));
        assert_eq!(cache.advance(), Some(&json!("v2")));
        assert_eq!(cache.advance(), Some(&json!("v0")));
        assert_eq!(cache.idx(), 0);
    }

    #[test]
    fn test_single_value_repeats() {
        let mut cache = ValuesCache::seeded(Some(json!("only")));
        assert_eq!(cache.advance(), Some(&json!("only")));
        assert_eq!(cache.advance(), Some(&json!("only")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_empty_replacement_keeps_seed() {
        let mut cache = ValuesCache::seeded(Some(json!("seed")));
        assert!(!cache.replace_values(Vec::new()));
        assert_eq!(cache.advance(), Some(&json!("seed")));
    }

    #[test]
    fn test_index_survives_replacement() {
        let mut cache = ValuesCache::seeded(Some(json!("a")));
        cache.replace_values(vec![json!("a"), json!("b"), json!("c")]);
        cache.advance();
        cache.replace_values(vec![json!("x"), json!("y")]);

        assert_eq!(cache.idx(), 1);
        assert_eq!(cache.advance(), Some(&json!("x")));
    }

    #[test]
    fn test_position_clamped_after_shorter_replacement() {
        let mut cache = ValuesCache::seeded(Some(json!("a")));
        cache.replace_values(vec![json!("a"), json!("b"), json!("c"), json!("d")]);
        cache.advance();
        cache.advance();
        cache.advance();
        cache.replace_values(vec![json!("x"), json!("y")]);

        assert_eq!(cache.idx(), 3);
        assert_eq!(cache.position(), 1);
        assert_eq!(ValuesCache::seeded(None).position(), 0);
    }

    #[test]
    fn test_unseeded_cache_yields_nothing() {
        let mut cache = ValuesCache::seeded(None);
        assert!(cache.is_empty());
        assert_eq!(cache.advance(), None);
    }
}
