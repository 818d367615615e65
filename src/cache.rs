#![warn(missing_docs)]
//! In-memory cache of compiled evaluators.
//!
//! The cache maps a [`DerivativeKey`] to a shared [`CompiledEvaluator`]. Each key owns a
//! once-cell: the map is only write locked for creating the cell, the (expensive) differentiation
//! and compilation runs inside the cell. Concurrent first requests for the same key therefore
//! compile exactly once while requests for other keys are not blocked.
use std::{
    collections::HashMap,
    fmt::Display,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, OnceLock, PoisonError, RwLock,
    },
};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::{
    derivative::QuantityKind, expr::Expr, lambdify::CompiledEvaluator, medium::Polarization,
};

/// Identifies one compiled quantity of one medium.
///
/// Besides the medium identifier the key carries the [fingerprint](Expr::fingerprint) of the
/// index expression the evaluator was derived from. Media sharing an identifier but holding
/// different formulas therefore never hit each other's entries in a shared cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DerivativeKey {
    /// medium identifier
    pub medium: String,
    /// fingerprint of the index expression
    pub formula: u64,
    /// polarization branch
    pub polarization: Polarization,
    /// requested quantity
    pub kind: QuantityKind,
    /// derivative order
    pub order: u8,
}

impl DerivativeKey {
    /// Creates a new [`DerivativeKey`].
    #[must_use]
    pub fn new(
        medium: &str,
        formula: u64,
        polarization: Polarization,
        kind: QuantityKind,
        order: u8,
    ) -> Self {
        Self {
            medium: medium.to_owned(),
            formula,
            polarization,
            kind,
            order,
        }
    }
}

impl Display for DerivativeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.medium, self.polarization, self.kind, self.order
        )
    }
}

type Slot = Arc<OnceLock<Arc<CompiledEvaluator>>>;

/// Thread safe, lazily populated cache of compiled evaluators.
///
/// Entries are never evicted; they are only removed by [`EvaluatorCache::clear`].
#[derive(Debug, Default)]
pub struct EvaluatorCache {
    entries: RwLock<HashMap<DerivativeKey, Slot>>,
    compilations: AtomicUsize,
}

impl EvaluatorCache {
    /// Creates a new, empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Returns the evaluator stored for `key`, if it has been compiled already.
    #[must_use]
    pub fn get(&self, key: &DerivativeKey) -> Option<Arc<CompiledEvaluator>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).and_then(|slot| slot.get().cloned())
    }
    /// Returns the evaluator for `key`, compiling the expression produced by `builder` on a miss.
    ///
    /// `builder` is called at most once per key for the lifetime of the cache (or until the next
    /// [`clear`](Self::clear)).
    pub fn get_or_compile<F>(&self, key: &DerivativeKey, builder: F) -> Arc<CompiledEvaluator>
    where
        F: FnOnce() -> Expr,
    {
        if let Some(evaluator) = self.get(key) {
            trace!("cache hit for {key}");
            return evaluator;
        }
        let slot = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            entries.entry(key.clone()).or_default().clone()
        };
        slot.get_or_init(|| {
            let expr = builder();
            let evaluator = CompiledEvaluator::compile(&expr);
            self.compilations.fetch_add(1, Ordering::SeqCst);
            debug!(
                "compiled {key}: {} expression nodes -> {} instructions",
                expr.node_count(),
                evaluator.len()
            );
            Arc::new(evaluator)
        })
        .clone()
    }
    /// Number of compiled entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.values().filter(|slot| slot.get().is_some()).count()
    }
    /// Returns `true` if nothing has been compiled yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Checks if an evaluator for `key` has been compiled.
    #[must_use]
    pub fn contains(&self, key: &DerivativeKey) -> bool {
        self.get(key).is_some()
    }
    /// All keys with a compiled evaluator, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<DerivativeKey> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<DerivativeKey> = entries
            .iter()
            .filter(|(_, slot)| slot.get().is_some())
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }
    /// Total number of compilations performed by this cache.
    #[must_use]
    pub fn compilations(&self) -> usize {
        self.compilations.load(Ordering::SeqCst)
    }
    /// Drop all cached evaluators.
    ///
    /// Evaluators already handed out stay valid.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        debug!("clearing {} cached evaluators", entries.len());
        entries.clear();
    }
}
