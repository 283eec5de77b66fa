//! Emitters for a finished closure.
//!
//! Two notations are supported: a Prolog fact table for downstream rule
//! engines, and a label-resolved JSON document.
//!
//! ```text
//! symbol(0, 'a').
//! set(3, ['a', 'b', 'c']).
//! subset(0, 3).
//! refine(3, 3, 3, 0, 0, 0).
//! ```
//!
//! [`write_closure_file`] replaces its target only once the whole closure has
//! been written.

use std::io::{BufWriter, Write};
use std::path::Path;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::Closure;
use crate::fixpoint::FixpointStats;

/// Errors from writing output.
#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("failed to write output: {source}")]
    #[diagnostic(
        code(catrefine::export::io),
        help("Check that the output path is writable and the disk is not full.")
    )]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {message}")]
    #[diagnostic(code(catrefine::export::json))]
    Json { message: String },
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// Output notation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Prolog fact table.
    #[default]
    Prolog,
    /// Pretty-printed JSON.
    Json,
}

/// Exported symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolExport {
    pub id: u32,
    pub name: String,
}

/// Exported set with resolved member names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetExport {
    pub id: u32,
    pub symbols: Vec<String>,
}

/// Exported strict inclusion between two sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsetExport {
    pub subset: u32,
    pub superset: u32,
}

/// Exported refinement rule as raw set ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleExport {
    pub subject: u32,
    pub property: u32,
    pub object: u32,
    pub refined_subject: u32,
    pub refined_property: u32,
    pub refined_object: u32,
}

/// Whole-closure JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosureExport {
    pub symbols: Vec<SymbolExport>,
    pub sets: Vec<SetExport>,
    pub subsets: Vec<SubsetExport>,
    pub rules: Vec<RuleExport>,
    pub orphan_set: Option<u32>,
    pub stats: FixpointStats,
}

impl ClosureExport {
    pub fn from_closure(closure: &Closure) -> Self {
        let symbols = closure
            .symbols()
            .iter()
            .map(|(id, name)| SymbolExport {
                id: id.get(),
                name: name.to_owned(),
            })
            .collect();
        let sets = closure
            .store()
            .iter()
            .map(|set| SetExport {
                id: set.id().get(),
                symbols: closure.set_names(set),
            })
            .collect();
        let subsets = closure
            .subset_pairs()
            .into_iter()
            .map(|(sub, sup)| SubsetExport {
                subset: sub.get(),
                superset: sup.get(),
            })
            .collect();
        let rules = closure
            .rules()
            .iter()
            .map(|r| RuleExport {
                subject: r.original.subject.get(),
                property: r.original.property.get(),
                object: r.original.object.get(),
                refined_subject: r.refined.subject.get(),
                refined_property: r.refined.property.get(),
                refined_object: r.refined.object.get(),
            })
            .collect();
        Self {
            symbols,
            sets,
            subsets,
            rules,
            orphan_set: closure.store().orphan_set().map(|id| id.get()),
            stats: closure.stats().clone(),
        }
    }
}

/// Write `closure` in the chosen notation.
pub fn write_closure(
    closure: &Closure,
    format: OutputFormat,
    out: &mut impl Write,
) -> ExportResult<()> {
    match format {
        OutputFormat::Prolog => write_prolog(closure, out),
        OutputFormat::Json => write_json(closure, out),
    }
}

/// Write `closure` to `path` through a temporary file in the same directory.
///
/// The target is only replaced after the whole closure has been written and
/// flushed; on failure it is left as it was.
pub fn write_closure_file(
    closure: &Closure,
    format: OutputFormat,
    path: &Path,
) -> ExportResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        write_closure(closure, format, &mut out)?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write the Prolog fact table.
pub fn write_prolog(closure: &Closure, out: &mut impl Write) -> ExportResult<()> {
    writeln!(out, "% catrefine closure")?;
    writeln!(out, "% {}", closure.info())?;
    if let Some(orphan) = closure.store().orphan_set() {
        writeln!(out, "orphan_set({}).", orphan.get())?;
    }

    for (id, name) in closure.symbols().iter() {
        writeln!(out, "symbol({}, {}).", id.get(), quote_atom(name))?;
    }
    for set in closure.store().iter() {
        let members: Vec<String> = closure
            .set_names(set)
            .iter()
            .map(|n| quote_atom(n))
            .collect();
        writeln!(out, "set({}, [{}]).", set.id().get(), members.join(", "))?;
    }
    for (sub, sup) in closure.subset_pairs() {
        writeln!(out, "subset({}, {}).", sub.get(), sup.get())?;
    }
    for r in closure.rules() {
        writeln!(
            out,
            "refine({}, {}, {}, {}, {}, {}).",
            r.original.subject.get(),
            r.original.property.get(),
            r.original.object.get(),
            r.refined.subject.get(),
            r.refined.property.get(),
            r.refined.object.get()
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Write the pretty-printed JSON document.
pub fn write_json(closure: &Closure, out: &mut impl Write) -> ExportResult<()> {
    let doc = ClosureExport::from_closure(closure);
    serde_json::to_writer_pretty(&mut *out, &doc).map_err(|e| ExportError::Json {
        message: e.to_string(),
    })?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Single-quote a Prolog atom.
fn quote_atom(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('\'');
    for c in name.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}
