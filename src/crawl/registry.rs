// src/crawl/registry.rs
// =============================================================================
// The visited registry: URL -> what happened when we fetched it.
//
// A URL goes through at most two states per traversal:
//   claimed  -> visited (fetch succeeded, PageResult stored)
//   claimed  -> failed  (fetch failed, URL is never retried)
//
// `try_claim` is the deduplication point. It inserts the placeholder with the
// dashmap entry API, so the check and the insert happen under one shard
// lock, and two workers can never both win the same URL. The lock is never
// held while a page is being fetched.
//
// Each slot also remembers the smallest hop depth the URL was reached at.
// A URL can be claimed through a long path before its short path is seen
// (depth-first order, or a slow worker). When the short path shows up later,
// the page is not fetched again; its stored links are handed back so they
// can be followed from the shallower depth. That makes the set of fetched
// pages depend only on hop distances, not on scheduling order.
// =============================================================================

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::BTreeMap;

use crate::fetch::PageResult;

#[derive(Debug)]
enum Slot {
    Claimed { depth: usize },
    Visited { depth: usize, page: PageResult },
    Failed,
}

// Outcome of trying to take ownership of a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// The caller owns the URL and must fetch it
    Newly,
    /// Someone already claimed it at the same or a smaller depth
    Already,
    /// The page was already fetched from further away. Its links are to be
    /// followed again from the caller's (smaller) depth, without a fetch.
    Shallower(Vec<String>),
}

// Scoped to one traversal. The engine creates a fresh one per crawl.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    slots: DashMap<String, Slot>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_claim(&self, url: &str, depth: usize) -> Claim {
        match self.slots.entry(url.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(Slot::Claimed { depth });
                Claim::Newly
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                // Still being fetched: the fetcher picks up the new depth
                // when it stores the page
                Slot::Claimed { depth: claimed } if depth < *claimed => {
                    *claimed = depth;
                    Claim::Already
                }
                Slot::Visited { depth: visited, page } if depth < *visited => {
                    *visited = depth;
                    Claim::Shallower(page.found_links.clone())
                }
                _ => Claim::Already,
            },
        }
    }

    // Stores the fetched page and returns the depth its links should be
    // followed from: the smallest depth the URL was reached at while the
    // fetch ran. Returns None (and keeps the existing page) if a page was
    // already stored for this URL.
    pub fn insert(&self, url: &str, depth: usize, page: PageResult) -> Option<usize> {
        match self.slots.entry(url.to_string()) {
            Entry::Occupied(mut entry) => {
                let depth = match entry.get() {
                    Slot::Visited { .. } => return None,
                    Slot::Claimed { depth: claimed } => depth.min(*claimed),
                    Slot::Failed => depth,
                };
                entry.insert(Slot::Visited { depth, page });
                Some(depth)
            }
            Entry::Vacant(entry) => {
                entry.insert(Slot::Visited { depth, page });
                Some(depth)
            }
        }
    }

    pub fn mark_failed(&self, url: &str) {
        if let Some(mut slot) = self.slots.get_mut(url) {
            if matches!(*slot, Slot::Claimed { .. }) {
                *slot = Slot::Failed;
            }
        }
    }

    // True once the URL has been claimed, whatever happened afterwards
    pub fn contains(&self, url: &str) -> bool {
        self.slots.contains_key(url)
    }

    pub fn get(&self, url: &str) -> Option<PageResult> {
        self.slots.get(url).and_then(|slot| match slot.value() {
            Slot::Visited { page, .. } => Some(page.clone()),
            _ => None,
        })
    }

    // Smallest hop depth a fetched page was reached at
    pub fn depth_of(&self, url: &str) -> Option<usize> {
        self.slots.get(url).and_then(|slot| match slot.value() {
            Slot::Visited { depth, .. } => Some(*depth),
            _ => None,
        })
    }

    // Number of successfully fetched pages
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot.value(), Slot::Visited { .. }))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The traversal's output: every fetched page, ordered by URL
    pub fn pages(&self) -> BTreeMap<String, PageResult> {
        self.slots
            .iter()
            .filter_map(|slot| match slot.value() {
                Slot::Visited { page, .. } => Some((slot.key().clone(), page.clone())),
                _ => None,
            })
            .collect()
    }
}
