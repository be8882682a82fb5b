use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use log::{debug, warn};

use crate::{
    method::{catalog::MethodCatalog, error::MethodIndexError, identifier::static_identifier},
    types::{RegistryGeneration, RpcIndex},
};

/// Lists every network-callable method identifier in wire order.
///
/// Static broadcast methods (`Type.Method`) come first, then instance
/// methods marked broadcast or authority (bare `Method`). Duplicates are
/// removed, keeping the first occurrence, and the result is sorted by
/// ordinal string comparison. The position in this list is the wire index.
///
/// Peers that sort with a culture-aware comparer may assign different
/// indices when names differ only in case or punctuation.
pub fn enumerate_identifiers(catalog: &dyn MethodCatalog) -> Vec<String> {
    let types = catalog.types();

    let static_methods = types.iter().flat_map(|type_desc| {
        type_desc
            .methods()
            .iter()
            .filter(|method| method.is_static() && method.attributes().broadcast)
            .map(|method| static_identifier(type_desc.full_name(), method.name()))
    });

    let instance_methods = types.iter().flat_map(|type_desc| {
        type_desc
            .methods()
            .iter()
            .filter(|method| !method.is_static() && method.attributes().is_network_callable())
            .map(|method| method.name().to_string())
    });

    let mut seen = HashSet::new();
    let mut identifiers: Vec<String> = static_methods
        .chain(instance_methods)
        .filter(|identifier| seen.insert(identifier.clone()))
        .collect();
    identifiers.sort();
    identifiers
}

// One registry generation: both lookup directions over the same enumeration
struct IndexTable {
    generation: RegistryGeneration,
    identifiers: Vec<String>,
    indices: HashMap<String, RpcIndex>,
}

impl IndexTable {
    fn new(generation: RegistryGeneration, identifiers: Vec<String>) -> Self {
        let indices = identifiers
            .iter()
            .enumerate()
            .map(|(index, identifier)| (identifier.clone(), index as RpcIndex))
            .collect();
        Self {
            generation,
            identifiers,
            indices,
        }
    }

    fn index_of(&self, identifier: &str) -> Option<RpcIndex> {
        self.indices.get(identifier).copied()
    }

    fn identifier_at(&self, index: RpcIndex) -> Option<&String> {
        self.identifiers.get(index as usize)
    }
}

struct IndexState {
    catalog: Arc<dyn MethodCatalog>,
    table: Option<IndexTable>,
    builds: RegistryGeneration,
}

impl IndexState {
    fn install(&mut self, identifiers: Vec<String>) {
        self.builds += 1;
        debug!(
            "Built RPC method index generation {} with {} entries",
            self.builds,
            identifiers.len()
        );
        self.table = Some(IndexTable::new(self.builds, identifiers));
    }

    // Called after a lookup missed. Re-enumerates the catalog; the fresh
    // enumeration only replaces the current table when it differs, so a
    // generation never changes its answers while the catalog is unchanged.
    fn refresh(&mut self) -> Option<&IndexTable> {
        let fresh = enumerate_identifiers(self.catalog.as_ref());
        match &self.table {
            None => self.install(fresh),
            Some(table) if table.identifiers != fresh => {
                warn!(
                    "RPC method catalog changed without invalidating generation {}; rebuilding",
                    table.generation
                );
                self.install(fresh);
            }
            Some(_) => {}
        }
        self.table.as_ref()
    }
}

/// Bidirectional map between method identifiers and dense wire indices.
///
/// The map is built lazily from the catalog on first lookup and kept until
/// `invalidate` is called (on code reload). Lookups share a read lock; builds
/// and invalidation take the write lock, so a half-built table is never seen.
pub struct MethodIndex {
    state: RwLock<IndexState>,
}

impl MethodIndex {
    pub fn new(catalog: Arc<dyn MethodCatalog>) -> Self {
        Self {
            state: RwLock::new(IndexState {
                catalog,
                table: None,
                builds: 0,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, IndexState>, MethodIndexError> {
        self.state
            .read()
            .map_err(|_| MethodIndexError::RwLockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, IndexState>, MethodIndexError> {
        self.state
            .write()
            .map_err(|_| MethodIndexError::RwLockPoisoned)
    }

    /// Wire index of `identifier` in the current generation
    pub fn resolve_index(&self, identifier: &str) -> Result<RpcIndex, MethodIndexError> {
        {
            let state = self.read()?;
            if let Some(index) = state.table.as_ref().and_then(|table| table.index_of(identifier)) {
                return Ok(index);
            }
        }

        let mut state = self.write()?;
        // another thread may have built the table while we waited
        if let Some(index) = state.table.as_ref().and_then(|table| table.index_of(identifier)) {
            return Ok(index);
        }
        state
            .refresh()
            .and_then(|table| table.index_of(identifier))
            .ok_or_else(|| MethodIndexError::UnregisteredMethod {
                identifier: identifier.to_string(),
            })
    }

    /// Identifier at `index` in the current generation
    pub fn resolve_identifier(&self, index: RpcIndex) -> Result<String, MethodIndexError> {
        {
            let state = self.read()?;
            if let Some(identifier) = state.table.as_ref().and_then(|table| table.identifier_at(index)) {
                return Ok(identifier.clone());
            }
        }

        let mut state = self.write()?;
        if let Some(identifier) = state.table.as_ref().and_then(|table| table.identifier_at(index)) {
            return Ok(identifier.clone());
        }
        state
            .refresh()
            .and_then(|table| table.identifier_at(index))
            .cloned()
            .ok_or(MethodIndexError::UnregisteredMethodIndex { index })
    }

    /// Drops the current generation. The next lookup enumerates the catalog again.
    pub fn invalidate(&self) -> Result<(), MethodIndexError> {
        let mut state = self.write()?;
        if state.table.take().is_some() {
            debug!("Invalidated RPC method index generation {}", state.builds);
        }
        Ok(())
    }

    /// Swaps in a new catalog and drops the current generation in one step
    pub fn replace_catalog(&self, catalog: Arc<dyn MethodCatalog>) -> Result<(), MethodIndexError> {
        let mut state = self.write()?;
        state.catalog = catalog;
        state.table = None;
        Ok(())
    }

    pub fn catalog(&self) -> Result<Arc<dyn MethodCatalog>, MethodIndexError> {
        Ok(self.read()?.catalog.clone())
    }

    /// The current generation number, or `None` when no table is built
    pub fn generation(&self) -> Result<Option<RegistryGeneration>, MethodIndexError> {
        Ok(self.read()?.table.as_ref().map(|table| table.generation))
    }

    /// All identifiers of the current generation in index order, building it if needed
    pub fn identifiers(&self) -> Result<Vec<String>, MethodIndexError> {
        {
            let state = self.read()?;
            if let Some(table) = &state.table {
                return Ok(table.identifiers.clone());
            }
        }
        let mut state = self.write()?;
        if let Some(table) = &state.table {
            return Ok(table.identifiers.clone());
        }
        Ok(state
            .refresh()
            .map(|table| table.identifiers.clone())
            .unwrap_or_default())
    }
}
