//! Per-feature operation tables.
//!
//! A table is an ordered slice of [`TableEntry`]s. The first entry whose
//! model mask intersects the running model wins; an entry with an empty mask
//! ends the table early.

use crate::{BackendKind, ModelMask, Operation};
use alloc::vec::Vec;
use log::warn;

/// One row of a feature table.
///
/// `extra` carries feature-specific data next to the operation (a battery
/// register layout, a fan decoding rule, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry<E = ()> {
    pub models: ModelMask,
    pub op: Operation,
    pub extra: E,
}

impl TableEntry {
    #[must_use]
    pub const fn new(models: ModelMask, op: Operation) -> Self {
        Self {
            models,
            op,
            extra: (),
        }
    }

    /// End-of-table marker.
    pub const END: Self = Self::new(ModelMask::empty(), Operation::bare(BackendKind::Ec));
}

impl<E> TableEntry<E> {
    #[must_use]
    pub const fn with(models: ModelMask, op: Operation, extra: E) -> Self {
        Self { models, op, extra }
    }

    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.models.is_empty()
    }
}

/// The first entry applying to `model`.
///
/// Entries after an end marker are never considered.
#[must_use]
pub fn find<E>(table: &[TableEntry<E>], model: ModelMask) -> Option<&TableEntry<E>> {
    table
        .iter()
        .take_while(|entry| !entry.is_end())
        .find(|entry| entry.models.intersects(model))
}

/// Index pairs `(i, j)`, `i < j`, of live entries sharing a model.
///
/// For such a pair entry `j` can never match that model, which is almost
/// always a mistake in the table.
#[must_use]
pub fn ambiguities<E>(table: &[TableEntry<E>]) -> Vec<(usize, usize)> {
    let live = table.iter().take_while(|entry| !entry.is_end()).count();
    let live = &table[..live];
    let mut pairs = Vec::new();
    for (i, first) in live.iter().enumerate() {
        for (j, later) in live.iter().enumerate().skip(i + 1) {
            if first.models.intersects(later.models) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Logs every overlap; returns `true` if the table is unambiguous.
pub(crate) fn check<E>(name: &str, table: &[TableEntry<E>]) -> bool {
    let pairs = ambiguities(table);
    for &(i, j) in &pairs {
        warn!(
            "{name}: entry {j} is shadowed by entry {i} for {:?}",
            table[i].models & table[j].models
        );
    }
    pairs.is_empty()
}
