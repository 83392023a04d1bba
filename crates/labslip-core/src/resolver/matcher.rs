//! Catalog matching cascade.
//!
//! A form value is matched against catalog entries in this order:
//! 1. Numeric id string (always wins over names)
//! 2. Exact name (case-insensitive)
//! 3. Substring in either direction (composite display strings)
//! 4. Alphanumeric key equality
//! 5. Jaro-Winkler similarity on alphanumeric keys

use std::collections::HashMap;

use strsim::jaro_winkler;

use crate::models::CatalogEntry;

use super::normalizer::{is_placeholder, normalize_key, parse_numeric_id};

/// Minimum similarity for the last-resort fuzzy step.
const MIN_SIMILARITY: f64 = 0.90;

/// Which step of the cascade produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
    Id,
    Exact,
    Substring,
    Normalized,
    Similarity,
}

/// A matched catalog entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogMatch<'a, T> {
    pub entry: &'a T,
    pub method: MatchMethod,
    /// 1.0 for every step except similarity
    pub score: f64,
}

/// Catalog entries with lookup tables built once when the catalog is fetched.
#[derive(Debug, Clone)]
pub struct Lookup<T> {
    entries: Vec<T>,
    by_id: HashMap<i64, usize>,
    by_name: HashMap<String, usize>,
    by_key: HashMap<String, usize>,
}

impl<T: CatalogEntry> Lookup<T> {
    /// Index entries. The first entry wins when names collide.
    pub fn new(entries: Vec<T>) -> Self {
        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();
        let mut by_key = HashMap::new();

        for (pos, entry) in entries.iter().enumerate() {
            by_id.entry(entry.id()).or_insert(pos);
            by_name
                .entry(entry.name().trim().to_lowercase())
                .or_insert(pos);
            let key = normalize_key(entry.name());
            if !key.is_empty() {
                by_key.entry(key).or_insert(pos);
            }
        }

        Self {
            entries,
            by_id,
            by_name,
            by_key,
        }
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.by_id.get(&id).map(|pos| &self.entries[*pos])
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the matching cascade for a form value.
    pub fn find(&self, query: &str) -> Option<CatalogMatch<'_, T>> {
        if is_placeholder(query) {
            return None;
        }

        if let Some(id) = parse_numeric_id(query) {
            if let Some(entry) = self.get(id) {
                return Some(self.hit(entry, MatchMethod::Id));
            }
        }

        let query_lower = query.trim().to_lowercase();
        if let Some(pos) = self.by_name.get(&query_lower) {
            return Some(self.hit(&self.entries[*pos], MatchMethod::Exact));
        }

        if let Some(entry) = self.find_substring(&query_lower) {
            return Some(self.hit(entry, MatchMethod::Substring));
        }

        let key = normalize_key(query);
        if key.is_empty() {
            return None;
        }
        if let Some(pos) = self.by_key.get(&key) {
            return Some(self.hit(&self.entries[*pos], MatchMethod::Normalized));
        }

        self.find_similar(&key)
    }

    /// Longest name contained in the query, or containing it.
    fn find_substring(&self, query_lower: &str) -> Option<&T> {
        self.entries
            .iter()
            .filter(|entry| {
                let name = entry.name().trim().to_lowercase();
                !name.is_empty() && (name.contains(query_lower) || query_lower.contains(&name))
            })
            .max_by_key(|entry| entry.name().trim().len())
    }

    fn find_similar(&self, key: &str) -> Option<CatalogMatch<'_, T>> {
        self.entries
            .iter()
            .map(|entry| (entry, jaro_winkler(key, &normalize_key(entry.name()))))
            .filter(|(_, score)| *score >= MIN_SIMILARITY)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(entry, score)| CatalogMatch {
                entry,
                method: MatchMethod::Similarity,
                score,
            })
    }

    fn hit<'a>(&'a self, entry: &'a T, method: MatchMethod) -> CatalogMatch<'a, T> {
        CatalogMatch {
            entry,
            method,
            score: 1.0,
        }
    }
}
