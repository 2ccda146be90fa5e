// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # ontoscope
//!
//! An OWL/RDF ontology explorer: parse an RDF/XML document, project it into a
//! node/edge view, and ask a language model to analyze and improve it.
//!
//! ## Architecture
//!
//! - **RDF adapter** (`rdf`): RDF/XML parse/serialize via `oxigraph`, plain statement model
//! - **Graph projection** (`projection`): classified nodes, colored edges, HTML view
//! - **Prompts** (`prompt`): instruction text with the required output shape embedded
//! - **Analysis** (`analysis`): four isolated analysis requests plus the improvement merge
//! - **Model clients** (`llm`): OpenAI-compatible, Ollama, and canned offline replies
//! - **Reports** (`report`): `.docx` and Markdown renderings of an analysis
//! - **Session** (`session`): the current text with its derived graph and projection
//!
//! ## Library usage
//!
//! ```no_run
//! use ontoscope::analysis::Analyzer;
//! use ontoscope::llm::CannedModel;
//! use ontoscope::{projection, rdf};
//!
//! let text = std::fs::read_to_string("zoo.owl").unwrap();
//! let graph = rdf::parse(&text, rdf::DEFAULT_BASE_IRI).unwrap();
//! let view = projection::build(&graph);
//! println!("{} nodes, {} edges", view.nodes.len(), view.edges.len());
//!
//! let analyzer = Analyzer::new(CannedModel::with_examples());
//! let result = analyzer.analyze(&text);
//! if let Some(updated) = analyzer.improve(&text, &result) {
//!     println!("{updated}");
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod llm;
pub mod projection;
pub mod prompt;
pub mod rdf;
pub mod report;
pub mod session;
