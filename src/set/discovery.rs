//! Discovery of complete image sets.
//!
//! The registry scans the reference directory for top-left quadrant files,
//! extracts candidate keys from their basenames and keeps a key only if all
//! four quadrant files exist on disk. The result is computed once and reused
//! for the lifetime of the process; new files require a restart to appear.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{error, info, warn};

use super::resolver::{PathResolver, QuadrantPaths};

/// Basename pattern of the top-left quadrant: a 4-digit key plus fixed suffix.
const KEY_PATTERN: &str = r"^(\d{4})-4x_cropped\.png$";

// =============================================================================
// SetRegistry
// =============================================================================

/// Process-wide registry of discovered set keys.
///
/// The key list is computed lazily on first access and published through a
/// write-once cell; every later call returns the same slice without touching
/// disk. Partial sets (a key present in fewer than four locations) are
/// silently excluded, since they are expected while a dataset is still being
/// produced.
pub struct SetRegistry {
    resolver: PathResolver,
    sets: OnceLock<Vec<String>>,
}

impl SetRegistry {
    /// Create a registry over the given resolver. No disk access happens
    /// until the first call to [`available_sets`](Self::available_sets).
    pub fn new(resolver: PathResolver) -> Self {
        Self {
            resolver,
            sets: OnceLock::new(),
        }
    }

    /// The resolver used to map keys to quadrant paths.
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// The sorted list of keys for which all four quadrant files exist.
    ///
    /// The first call scans the reference directory; all subsequent calls
    /// return the memoized result.
    pub fn available_sets(&self) -> &[String] {
        self.sets.get_or_init(|| self.discover())
    }

    /// Whether a key was discovered as a complete set.
    pub fn contains(&self, key: &str) -> bool {
        // The discovered list is sorted ascending.
        self.available_sets()
            .binary_search_by(|k| k.as_str().cmp(key))
            .is_ok()
    }

    /// Resolve the quadrant paths for a key, without checking the registry.
    pub fn resolve(&self, key: &str) -> QuadrantPaths {
        self.resolver.resolve(key)
    }

    fn discover(&self) -> Vec<String> {
        let reference_dir = self.resolver.reference_dir();
        let pattern = Regex::new(KEY_PATTERN).expect("key pattern is valid");

        info!(
            "Scanning {} for candidate set keys",
            reference_dir.display()
        );

        let entries = match std::fs::read_dir(reference_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Could not read reference directory {}: {}",
                    reference_dir.display(),
                    e
                );
                return Vec::new();
            }
        };

        // BTreeSet gives deduplication plus ascending key order.
        let mut candidates = BTreeSet::new();
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(captures) = pattern.captures(name) {
                candidates.insert(captures[1].to_string());
            }
        }

        if candidates.is_empty() {
            warn!(
                "No candidate set keys found in {}",
                reference_dir.display()
            );
            return Vec::new();
        }

        info!(
            "Found {} candidate key(s), verifying complete sets",
            candidates.len()
        );

        let complete: Vec<String> = candidates
            .iter()
            .filter(|key| self.resolver.resolve(key).all_exist())
            .cloned()
            .collect();

        if complete.is_empty() {
            // Candidates exist but none form a complete set. Report one
            // example so the operator can see which file is missing, then
            // continue serving an empty registry.
            error!("No complete image sets found where all four files exist");
            if let Some(example) = candidates.iter().next() {
                info!("Example expected paths for key '{}':", example);
                for (quadrant, path) in self.resolver.resolve(example).iter() {
                    info!(
                        "  {}: {} (exists: {})",
                        quadrant.code(),
                        path.display(),
                        path.exists()
                    );
                }
            }
        } else {
            info!("Found {} complete image set(s)", complete.len());
        }

        complete
    }
}

// =============================================================================
// Tests
// =============================================================================
