// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # catrefine
//!
//! A closure engine over symbol category sets. Given a fixed relation of
//! ternary facts and an initial collection of symbol sets, it computes the
//! maximal self-consistent refinement of those sets under the relation and
//! emits both the final canonical set universe and the rules linking each
//! triple of input sets to its refined subsets.
//!
//! ## Architecture
//!
//! - **Symbol table** (`symbol`): dense ids for names, special-symbol markers
//! - **Triple index** (`graph`): sorted, read-only fact keys
//! - **Set store** (`store`): canonical, deduplicated set universe
//! - **Refinement** (`refine`, `policy`): per-triple narrowing with a pluggable exemption
//! - **Fixpoint** (`fixpoint`, `collector`): worklist driver and rule log
//! - **I/O** (`input`, `export`, `config`): `%%` reader, fact-table/JSON writers, TOML config
//!
//! ## Library usage
//!
//! ```no_run
//! use catrefine::engine::{Engine, EngineConfig};
//!
//! let mut engine = Engine::new(EngineConfig::default()).unwrap();
//! for name in ["a", "b", "c"] {
//!     engine.intern_symbol(name).unwrap();
//! }
//! engine.add_triple("a", "a", "a").unwrap();
//! engine.add_set(&["a", "b", "c"]).unwrap();
//! let closure = engine.run().unwrap();
//! println!("{}", closure.info());
//! ```

pub mod collector;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod fixpoint;
pub mod graph;
pub mod input;
pub mod policy;
pub mod refine;
pub mod store;
pub mod symbol;
pub mod verify;
