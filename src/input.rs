//! Reader for the line-oriented `%%` input format.
//!
//! ```text
//! classID            <- symbol block, one name per line
//! owlClass
//! rdftype
//! %%
//! classID rdftype owlClass   <- triple block: subject property object
//! %%
//! classID owlClass           <- set block: whitespace-separated names
//! ```
//!
//! A terminator is a line holding exactly `%%`. The set block ends at a
//! terminator or at end of input. Blank lines and lines starting with `#`
//! are ignored. Names are not resolved here; the
//! engine reports unknown names when it loads the document.

use std::io::Read;
use std::path::Path;

use miette::Diagnostic;
use thiserror::Error;

/// Errors from reading input documents.
#[derive(Debug, Error, Diagnostic)]
pub enum InputError {
    #[error("{block} block is not terminated by a `%%` line")]
    #[diagnostic(
        code(catrefine::input::missing_terminator),
        help("The symbol and triple blocks must each end with a line containing exactly `%%`.")
    )]
    MissingTerminator { block: &'static str },

    #[error("line {line}: expected `subject property object`, found {fields} field(s)")]
    #[diagnostic(
        code(catrefine::input::malformed_triple),
        help("Each triple line holds exactly three whitespace-separated symbol names.")
    )]
    MalformedTriple { line: usize, fields: usize },

    #[error("line {line}: symbol name \"{text}\" contains whitespace")]
    #[diagnostic(
        code(catrefine::input::malformed_symbol),
        help("The symbol block holds one name per line.")
    )]
    MalformedSymbol { line: usize, text: String },

    #[error("failed to read input: {path}")]
    #[diagnostic(
        code(catrefine::input::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type InputResult<T> = std::result::Result<T, InputError>;

/// A triple line: three names with the 1-based line they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripleLine {
    pub line: usize,
    pub names: [String; 3],
}

/// A set line: member names with the 1-based line they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetLine {
    pub line: usize,
    pub names: Vec<String>,
}

/// Parsed but unresolved input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputDocument {
    pub symbols: Vec<String>,
    pub triples: Vec<TripleLine>,
    pub sets: Vec<SetLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Symbols,
    Triples,
    Sets,
    Done,
}

impl InputDocument {
    /// Parse a document from text.
    pub fn parse(text: &str) -> InputResult<Self> {
        let mut doc = InputDocument::default();
        let mut block = Block::Symbols;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            if raw == "%%" {
                block = match block {
                    Block::Symbols => Block::Triples,
                    Block::Triples => Block::Sets,
                    Block::Sets | Block::Done => Block::Done,
                };
                if block == Block::Done {
                    break;
                }
                continue;
            }
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            match block {
                Block::Symbols => {
                    if trimmed.split_whitespace().nth(1).is_some() {
                        return Err(InputError::MalformedSymbol {
                            line,
                            text: trimmed.to_owned(),
                        });
                    }
                    doc.symbols.push(trimmed.to_owned());
                }
                Block::Triples => {
                    let fields: Vec<&str> = trimmed.split_whitespace().collect();
                    let [s, p, o] = fields.as_slice() else {
                        return Err(InputError::MalformedTriple {
                            line,
                            fields: fields.len(),
                        });
                    };
                    doc.triples.push(TripleLine {
                        line,
                        names: [(*s).to_owned(), (*p).to_owned(), (*o).to_owned()],
                    });
                }
                Block::Sets => doc.sets.push(SetLine {
                    line,
                    names: trimmed.split_whitespace().map(str::to_owned).collect(),
                }),
                Block::Done => unreachable!("parsing stops at the final terminator"),
            }
        }

        match block {
            Block::Symbols => Err(InputError::MissingTerminator { block: "symbol" }),
            Block::Triples => Err(InputError::MissingTerminator { block: "triple" }),
            Block::Sets | Block::Done => Ok(doc),
        }
    }

    /// Read and parse a file.
    pub fn read_path(path: &Path) -> InputResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| InputError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&text)
    }

    /// Read and parse everything from `reader`; `label` names it in errors.
    pub fn read_from(mut reader: impl Read, label: &str) -> InputResult<Self> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| InputError::Io {
                path: label.to_owned(),
                source: e,
            })?;
        Self::parse(&text)
    }
}
