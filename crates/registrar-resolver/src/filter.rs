//! Kind filtering and sort options

use crate::errors::{ResolveError, ResolveResult};
use registrar_types::EntityKind;
use std::collections::BTreeSet;

/// Which entity kinds the sorter yields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindFilter {
    All,
    Include(BTreeSet<EntityKind>),
    Exclude(BTreeSet<EntityKind>),
}

impl KindFilter {
    /// Combine include and exclude sets. Empty sets count as unset;
    /// setting both is a configuration error.
    pub fn new(include: &BTreeSet<EntityKind>, exclude: &BTreeSet<EntityKind>) -> ResolveResult<Self> {
        match (include.is_empty(), exclude.is_empty()) {
            (false, false) => Err(ResolveError::FilterConflict),
            (false, true) => Ok(KindFilter::Include(include.clone())),
            (true, false) => Ok(KindFilter::Exclude(exclude.clone())),
            (true, true) => Ok(KindFilter::All),
        }
    }

    pub fn admits(&self, kind: EntityKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Include(kinds) => kinds.contains(&kind),
            KindFilter::Exclude(kinds) => !kinds.contains(&kind),
        }
    }
}

/// Options for ordering entities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOptions {
    pub include_kinds: BTreeSet<EntityKind>,
    pub exclude_kinds: BTreeSet<EntityKind>,
    /// Fail on dependencies that are not defined in the scanned packages.
    /// When false they are left out of the order silently.
    pub only_include_defs: bool,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            include_kinds: BTreeSet::new(),
            exclude_kinds: BTreeSet::new(),
            only_include_defs: true,
        }
    }
}

impl SortOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(mut self, kinds: impl IntoIterator<Item = EntityKind>) -> Self {
        self.include_kinds.extend(kinds);
        self
    }

    pub fn exclude(mut self, kinds: impl IntoIterator<Item = EntityKind>) -> Self {
        self.exclude_kinds.extend(kinds);
        self
    }

    /// Skip undefined dependencies instead of failing
    pub fn allow_undefined(mut self) -> Self {
        self.only_include_defs = false;
        self
    }

    pub fn filter(&self) -> ResolveResult<KindFilter> {
        KindFilter::new(&self.include_kinds, &self.exclude_kinds)
    }
}
