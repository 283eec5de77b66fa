//! Engine facade: top-level API for one closure run.
//!
//! The [`Engine`] collects symbols, facts and initial sets, then
//! [`Engine::run`] consumes it and returns a [`Closure`] owning the final
//! universe. A failed run returns no partial result.

use std::collections::BTreeMap;

use crate::collector::RuleLog;
use crate::error::{CatResult, EngineError};
use crate::fixpoint::{FixpointDriver, FixpointStats};
use crate::graph::Triple;
use crate::graph::index::TripleIndex;
use crate::input::InputDocument;
use crate::policy::{ExemptionPolicy, OrphanListExemption};
use crate::refine::{Refiner, RefinementRule};
use crate::store::{SetId, SetStore, SymbolSet};
use crate::symbol::{SpecialNames, SymbolId, SymbolTable};

/// Capacity bounds for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum symbols; also the per-component triple bound.
    pub max_symbols: usize,
    pub max_triples: usize,
    pub max_sets: usize,
    pub max_rules: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_symbols: 1024,
            max_triples: 2000,
            max_sets: 5000,
            max_rules: 500_000,
        }
    }
}

/// Configuration for the catrefine engine.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub special: SpecialNames,
    pub limits: Limits,
}

/// Loader and runner for a single closure computation.
pub struct Engine {
    config: EngineConfig,
    symbols: SymbolTable,
    triples: Vec<Triple>,
    sets: Vec<Vec<SymbolId>>,
}

impl Engine {
    /// Create an empty engine with the given configuration.
    pub fn new(config: EngineConfig) -> CatResult<Self> {
        let limits = config.limits;
        if limits.max_symbols == 0 || limits.max_sets == 0 {
            return Err(EngineError::InvalidConfig {
                message: "max_symbols and max_sets must be > 0".into(),
            }
            .into());
        }
        if limits.max_symbols > limits.max_sets {
            return Err(EngineError::InvalidConfig {
                message: format!(
                    "max_sets ({}) must hold a singleton for each of max_symbols ({})",
                    limits.max_sets, limits.max_symbols
                ),
            }
            .into());
        }

        let symbols = SymbolTable::new(limits.max_symbols, config.special.clone());
        Ok(Self {
            config,
            symbols,
            triples: Vec::new(),
            sets: Vec::new(),
        })
    }

    /// Build an engine from a parsed input document.
    pub fn from_document(config: EngineConfig, doc: &InputDocument) -> CatResult<Self> {
        let mut engine = Self::new(config)?;
        for name in &doc.symbols {
            if engine.symbols.contains(name) {
                tracing::warn!(name = %name, "duplicate symbol name ignored");
            }
            engine.intern_symbol(name)?;
        }
        for line in &doc.triples {
            let [s, p, o] = &line.names;
            engine.add_triple(s, p, o)?;
        }
        for line in &doc.sets {
            engine.add_set(line.names.as_slice())?;
        }
        Ok(engine)
    }

    /// Intern a symbol name.
    pub fn intern_symbol(&mut self, name: &str) -> CatResult<SymbolId> {
        Ok(self.symbols.intern(name)?)
    }

    /// Add a fact over previously interned names.
    pub fn add_triple(&mut self, subject: &str, property: &str, object: &str) -> CatResult<()> {
        let triple = Triple::new(
            self.symbols.lookup(subject)?,
            self.symbols.lookup(property)?,
            self.symbols.lookup(object)?,
        );
        self.triples.push(triple);
        Ok(())
    }

    /// Add an initial set over previously interned names.
    pub fn add_set<S: AsRef<str>>(&mut self, names: &[S]) -> CatResult<()> {
        let members = names
            .iter()
            .map(|n| self.symbols.lookup(n.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.sets.push(members);
        Ok(())
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Number of facts added so far (duplicates included).
    pub fn triple_count(&self) -> usize {
        self.triples.len()
    }

    /// Number of initial set lines added so far.
    pub fn set_count(&self) -> usize {
        self.sets.len()
    }

    /// Run to fixpoint with the orphan/list-structure exemption.
    pub fn run(self) -> CatResult<Closure> {
        let policy = OrphanListExemption::from_table(&self.symbols);
        self.run_with_policy(&policy)
    }

    /// Run to fixpoint with a caller-supplied exemption policy.
    pub fn run_with_policy<P: ExemptionPolicy + ?Sized>(self, policy: &P) -> CatResult<Closure> {
        let Engine {
            config,
            symbols,
            triples,
            sets,
        } = self;
        let limits = config.limits;

        let index = TripleIndex::build(triples, symbols.capacity(), limits.max_triples)?;

        let mut store = SetStore::new(symbols.orphan(), limits.max_sets);
        for (id, _) in symbols.iter() {
            store.register_set([id])?;
        }
        for (ordinal, members) in sets.into_iter().enumerate() {
            let before = store.len();
            let id = store.register_set(members)?;
            if store.len() == before {
                tracing::warn!(input_set = ordinal + 1, %id, "input set equals an existing set");
            }
        }
        let initial_sets = store.len();

        tracing::info!(
            symbols = symbols.len(),
            triples = index.len(),
            sets = initial_sets,
            "starting closure"
        );

        let mut log = RuleLog::new(limits.max_rules);
        let refiner = Refiner::new(&index, policy);
        let stats = FixpointDriver::new(refiner).run(&mut store, &mut log)?;

        tracing::info!(
            sets = store.len(),
            minted = stats.sets_minted,
            rules = stats.rules,
            refinements = stats.refinements,
            "closure complete"
        );

        Ok(Closure {
            symbols,
            index,
            store,
            rules: log.into_rules(),
            initial_sets,
            stats,
        })
    }
}

/// The final state of a run: set universe plus rules in discovery order.
#[derive(Debug, Clone)]
pub struct Closure {
    symbols: SymbolTable,
    index: TripleIndex,
    store: SetStore,
    rules: Vec<RefinementRule>,
    initial_sets: usize,
    stats: FixpointStats,
}

impl Closure {
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn index(&self) -> &TripleIndex {
        &self.index
    }

    pub fn store(&self) -> &SetStore {
        &self.store
    }

    pub fn rules(&self) -> &[RefinementRule] {
        &self.rules
    }

    /// Sets present before the fixpoint started (singletons + input sets).
    pub fn initial_sets(&self) -> usize {
        self.initial_sets
    }

    pub fn stats(&self) -> &FixpointStats {
        &self.stats
    }

    /// Number of sets per cardinality.
    pub fn size_histogram(&self) -> BTreeMap<usize, usize> {
        let mut hist = BTreeMap::new();
        for set in self.store.iter() {
            *hist.entry(set.len()).or_insert(0) += 1;
        }
        hist
    }

    /// Strict subset order over the final universe as (sub, super) pairs,
    /// sorted by id.
    pub fn subset_pairs(&self) -> Vec<(SetId, SetId)> {
        // Content order puts every proper subset before its supersets.
        let by_content: Vec<&SymbolSet> = self.store.iter_by_content().collect();
        let mut pairs = Vec::new();
        for (n, sub) in by_content.iter().enumerate() {
            for sup in &by_content[n + 1..] {
                if sup.len() > sub.len() && sub.is_subset_of(sup) {
                    pairs.push((sub.id(), sup.id()));
                }
            }
        }
        pairs.sort_unstable();
        pairs
    }

    /// Member names of a set, in member order.
    pub fn set_names(&self, set: &SymbolSet) -> Vec<String> {
        set.symbols()
            .iter()
            .map(|&s| self.symbols.resolve_name(s))
            .collect()
    }

    /// One-line summary of the run.
    pub fn info(&self) -> String {
        format!(
            "Symbols: {}, Triples: {}, Sets: {} ({} initial, {} minted), Rules: {}",
            self.symbols.len(),
            self.index.len(),
            self.store.len(),
            self.initial_sets,
            self.stats.sets_minted,
            self.rules.len()
        )
    }
}
