//! Rich diagnostic error types for the catrefine engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so the caller can report a clean
//! diagnostic instead of aborting. Violations of the engine's internal
//! invariants are not represented here: they are assertions.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for catrefine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum CatError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Symbol(#[from] SymbolError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Input(#[from] crate::input::InputError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Export(#[from] crate::export::ExportError),
}

// ---------------------------------------------------------------------------
// Symbol errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SymbolError {
    #[error("unknown symbol: \"{name}\"")]
    #[diagnostic(
        code(catrefine::symbol::unknown),
        help(
            "Every name used in the triple and set blocks must first be declared \
             in the symbol block (the lines before the first `%%`)."
        )
    )]
    UnknownSymbol { name: String },

    #[error("symbol table capacity exceeded: at most {limit} symbols")]
    #[diagnostic(
        code(catrefine::symbol::capacity),
        help("Raise `limits.max_symbols` in the configuration file.")
    )]
    CapacityExceeded { limit: usize },
}

// ---------------------------------------------------------------------------
// Triple index errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum IndexError {
    #[error("triple {position} component {value} is outside the symbol bound {bound}")]
    #[diagnostic(
        code(catrefine::index::out_of_range),
        help(
            "Each triple component must be an interned symbol id below the \
             configured symbol bound. Raise `limits.max_symbols` or check the input."
        )
    )]
    ComponentOutOfRange {
        position: &'static str,
        value: u32,
        bound: usize,
    },

    #[error("triple index capacity exceeded: {count} distinct triples, at most {limit}")]
    #[diagnostic(
        code(catrefine::index::capacity),
        help("Raise `limits.max_triples` in the configuration file.")
    )]
    CapacityExceeded { count: usize, limit: usize },
}

// ---------------------------------------------------------------------------
// Set store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("set store capacity exceeded: at most {limit} sets")]
    #[diagnostic(
        code(catrefine::store::capacity),
        help(
            "The closure produced more distinct sets than allowed. \
             Raise `limits.max_sets` in the configuration file."
        )
    )]
    CapacityExceeded { limit: usize },

    #[error("cannot register an empty set")]
    #[diagnostic(
        code(catrefine::store::empty_set),
        help("Every set line must name at least one symbol.")
    )]
    EmptySet,
}

// ---------------------------------------------------------------------------
// Engine errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("rule capacity exceeded: at most {limit} refinement rules")]
    #[diagnostic(
        code(catrefine::engine::rule_capacity),
        help("Raise `limits.max_rules` in the configuration file.")
    )]
    RuleCapacityExceeded { limit: usize },

    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(catrefine::engine::invalid_config),
        help("Check the [limits] and [special] tables of the configuration. {message}")
    )]
    InvalidConfig { message: String },

    #[error("closure verification failed with {count} violation(s); first: {first}")]
    #[diagnostic(
        code(catrefine::engine::verification),
        help(
            "The finished closure does not satisfy its own invariants. \
             This is a bug in catrefine; please report it with the input file."
        )
    )]
    VerificationFailed { count: usize, first: String },
}

/// Convenience alias for functions returning catrefine results.
pub type CatResult<T> = std::result::Result<T, CatError>;

/// Result type for symbol table operations.
pub type SymbolResult<T> = std::result::Result<T, SymbolError>;

/// Result type for triple index construction.
pub type IndexResult<T> = std::result::Result<T, IndexError>;

/// Result type for set store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type for engine bookkeeping such as the rule log.
pub type EngineResult<T> = std::result::Result<T, EngineError>;
