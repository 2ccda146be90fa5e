//! Rich diagnostic error types for ontoscope.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::llm::ModelError;

/// Top-level error type for ontoscope.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source spans) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum OntoError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Rdf(#[from] RdfError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Improve(#[from] ImproveError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// RDF errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum RdfError {
    #[error("failed to parse RDF/XML: {message}")]
    #[diagnostic(
        code(ontoscope::rdf::parse),
        help(
            "The ontology text is not well-formed RDF/XML. \
             Fix the markup reported above; visualization, analysis and \
             improvement stay unavailable until it parses."
        )
    )]
    Parse { message: String },

    #[error("invalid base IRI \"{iri}\": {message}")]
    #[diagnostic(
        code(ontoscope::rdf::base_iri),
        help("The base IRI must be an absolute IRI such as `http://example.org/`.")
    )]
    InvalidBaseIri { iri: String, message: String },

    #[error("invalid term \"{term}\": {message}")]
    #[diagnostic(
        code(ontoscope::rdf::invalid_term),
        help(
            "Subjects must be IRIs or blank nodes and predicates must be IRIs. \
             Check that the IRI is absolute and contains no spaces."
        )
    )]
    InvalidTerm { term: String, message: String },

    #[error("failed to serialize RDF/XML: {message}")]
    #[diagnostic(
        code(ontoscope::rdf::serialize),
        help("The graph contains a statement that RDF/XML cannot express.")
    )]
    Serialize { message: String },
}

// ---------------------------------------------------------------------------
// Prompt errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PromptError {
    #[error("the improvement prompt requires analysis results")]
    #[diagnostic(
        code(ontoscope::prompt::missing_analyses),
        help("Run `ontoscope analyze` first and pass its output with `--analysis`.")
    )]
    MissingAnalyses,

    #[error("failed to generate prompt: {source}")]
    #[diagnostic(code(ontoscope::prompt::rdf))]
    Rdf {
        #[source]
        source: RdfError,
    },

    #[error("failed to encode prompt payload: {message}")]
    #[diagnostic(
        code(ontoscope::prompt::encode),
        help("The ontology triples could not be rendered as JSON.")
    )]
    Encode { message: String },
}

// ---------------------------------------------------------------------------
// Improvement errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ImproveError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Rdf(#[from] RdfError),

    #[error("the model proposed no updated triples")]
    #[diagnostic(
        code(ontoscope::improve::empty),
        help("The ontology was left unchanged. Re-run the analysis or try another model.")
    )]
    EmptyUpdate,

    #[error("proposed triple #{index} is not valid RDF: {message}")]
    #[diagnostic(
        code(ontoscope::improve::invalid_triple),
        help(
            "The model returned a subject, predicate or URI object that is not an \
             absolute IRI. The whole update was discarded."
        )
    )]
    InvalidTriple { index: usize, message: String },
}

// ---------------------------------------------------------------------------
// Report errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ReportError {
    #[error("failed to write report archive: {message}")]
    #[diagnostic(
        code(ontoscope::report::archive),
        help("The .docx container could not be assembled.")
    )]
    Archive { message: String },

    #[error("report I/O error: {source}")]
    #[diagnostic(
        code(ontoscope::report::io),
        help("Check that the output directory exists and is writable.")
    )]
    Io {
        #[source]
        source: std::io::Error,
    },

    #[error("nothing to report: the analysis result has no sections")]
    #[diagnostic(
        code(ontoscope::report::empty),
        help("Every analysis request failed. Check the model configuration and retry.")
    )]
    Empty,
}

// ---------------------------------------------------------------------------
// Session errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SessionError {
    #[error("no ontology loaded")]
    #[diagnostic(
        code(ontoscope::session::empty),
        help("Load an RDF/XML file first.")
    )]
    NoOntology,

    #[error("an analysis or improvement is already running")]
    #[diagnostic(
        code(ontoscope::session::busy),
        help("Wait for the current request to finish.")
    )]
    Busy,

    #[error("no analysis result available")]
    #[diagnostic(
        code(ontoscope::session::no_analysis),
        help("Run the analysis before requesting an improvement or a report.")
    )]
    NoAnalysis,

    #[error("the ontology could not be improved")]
    #[diagnostic(
        code(ontoscope::session::improve_failed),
        help("The current ontology text was kept unchanged. See the log for the cause.")
    )]
    ImproveFailed,

    #[error("failed to read {path}")]
    #[diagnostic(
        code(ontoscope::session::read),
        help("Check that the file exists and is UTF-8 encoded RDF/XML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Rdf(#[from] RdfError),
}

/// Convenience alias for functions returning ontoscope results.
pub type OntoResult<T> = std::result::Result<T, OntoError>;

/// Result alias for the RDF adapter.
pub type RdfResult<T> = std::result::Result<T, RdfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rdf_error_converts_to_onto_error() {
        let err = RdfError::Parse {
            message: "unexpected end of file".into(),
        };
        let onto: OntoError = err.into();
        assert!(matches!(onto, OntoError::Rdf(RdfError::Parse { .. })));
    }

    #[test]
    fn improve_error_wraps_prompt_error() {
        let improve: ImproveError = PromptError::MissingAnalyses.into();
        assert!(matches!(
            improve,
            ImproveError::Prompt(PromptError::MissingAnalyses)
        ));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = RdfError::Parse {
            message: "line 3: unclosed tag".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("RDF/XML"));
        assert!(msg.contains("unclosed tag"));

        let err = ImproveError::InvalidTriple {
            index: 4,
            message: "relative IRI".into(),
        };
        assert!(format!("{err}").contains("#4"));
    }
}
