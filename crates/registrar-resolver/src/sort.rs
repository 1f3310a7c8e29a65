//! Cycle-safe topological sort
//!
//! Depth-first, post-order traversal over `upstream` edges with an explicit
//! frame stack. Each frame is a node being visited plus a cursor into its
//! upstream list; `recursion_index` maps every node on the stack to its
//! depth, which gives both O(1) cycle detection and the exact cycle path.
//!
//! A node is yielded once all of its upstream nodes are finished, so
//! consumers see every entity after the entities it depends on.

use crate::errors::{ResolveError, ResolveResult};
use crate::filter::{KindFilter, SortOptions};
use crate::graph::{Binding, ModuleMap};
use registrar_types::{Entity, EntityId, EntityStore};
use std::collections::{HashMap, HashSet};
use std::iter::FusedIterator;
use tracing::debug;

/// An entity ready to be registered, with the name it is bound to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Registrable<'a> {
    pub module: &'a str,
    pub symbol: &'a str,
    pub id: EntityId,
    pub entity: &'a Entity,
}

impl Registrable<'_> {
    /// `module.symbol`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module, self.symbol)
    }
}

#[derive(Debug)]
struct Frame<'a> {
    id: EntityId,
    entity: &'a Entity,
    cursor: usize,
}

/// Order the entities of a module map for registration.
///
/// Fails with [`ResolveError::FilterConflict`] before any traversal when
/// both include and exclude kinds are set. Other errors surface from the
/// returned iterator, which stops after the first one.
pub fn sort<'a>(
    map: &'a ModuleMap,
    store: &'a EntityStore,
    options: &SortOptions,
) -> ResolveResult<TopologicalSort<'a>> {
    let filter = options.filter()?;
    Ok(TopologicalSort {
        map,
        store,
        filter,
        only_include_defs: options.only_include_defs,
        visited: HashSet::new(),
        stack: Vec::new(),
        recursion_index: HashMap::new(),
        next_root: 0,
        finished: false,
    })
}

/// Lazy registration order over a module map
#[derive(Debug)]
pub struct TopologicalSort<'a> {
    map: &'a ModuleMap,
    store: &'a EntityStore,
    filter: KindFilter,
    only_include_defs: bool,
    visited: HashSet<EntityId>,
    stack: Vec<Frame<'a>>,
    recursion_index: HashMap<EntityId, usize>,
    next_root: usize,
    finished: bool,
}

impl<'a> TopologicalSort<'a> {
    fn next_root(&mut self) -> Option<EntityId> {
        while let Some(&id) = self.map.ids().get(self.next_root) {
            self.next_root += 1;
            if !self.visited.contains(&id) {
                return Some(id);
            }
        }
        None
    }

    fn push(&mut self, id: EntityId) -> ResolveResult<()> {
        if let Some(&start) = self.recursion_index.get(&id) {
            let mut path: Vec<String> = self.stack[start..]
                .iter()
                .map(|frame| self.map.label(frame.id, self.store))
                .collect();
            path.push(self.map.label(id, self.store));
            return Err(ResolveError::CycleDetected { path });
        }

        let entity = self.store.entity(id)?;
        self.recursion_index.insert(id, self.stack.len());
        self.stack.push(Frame {
            id,
            entity,
            cursor: 0,
        });
        Ok(())
    }

    fn step(&mut self) -> ResolveResult<Option<Registrable<'a>>> {
        loop {
            let Some(frame) = self.stack.last_mut() else {
                match self.next_root() {
                    Some(root) => {
                        self.push(root)?;
                        continue;
                    }
                    None => return Ok(None),
                }
            };

            let entity = frame.entity;
            if let Some(&upstream) = entity.upstream.get(frame.cursor) {
                frame.cursor += 1;
                if !self.visited.contains(&upstream) {
                    self.push(upstream)?;
                }
                continue;
            }

            let id = frame.id;
            self.stack.pop();
            self.recursion_index.remove(&id);
            self.visited.insert(id);

            if !self.filter.admits(entity.kind) {
                continue;
            }

            let map: &'a ModuleMap = self.map;
            match map.get(id) {
                Some(Binding { module, symbol }) => {
                    return Ok(Some(Registrable {
                        module,
                        symbol,
                        id,
                        entity,
                    }));
                }
                None if self.only_include_defs => {
                    return Err(ResolveError::UndefinedEntity {
                        description: self.store.describe(id),
                    });
                }
                None => {
                    debug!(entity = %self.store.describe(id), "Skipping dependency defined outside the scanned packages");
                }
            }
        }
    }
}

impl<'a> Iterator for TopologicalSort<'a> {
    type Item = ResolveResult<Registrable<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.step() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for TopologicalSort<'_> {}
