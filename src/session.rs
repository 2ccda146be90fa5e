//! One ontology being explored.
//!
//! The RDF/XML text is the source of truth; the parsed graph and its
//! projection are derived from it and rebuilt on every change. The text is
//! only ever replaced as a whole, by a load, an edit, or a successful
//! improvement.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::analysis::{AnalysisResult, Analyzer};
use crate::error::{RdfError, SessionError};
use crate::llm::ModelClient;
use crate::projection::{self, Projection, rules::EdgePalette};
use crate::rdf::{self, Graph};
use crate::report::{DEFAULT_PLACEHOLDER, Report};

/// Editing and analysis state for a single ontology document.
#[derive(Debug)]
pub struct Session<M> {
    analyzer: Analyzer<M>,
    palette: EdgePalette,
    placeholder: String,
    text: Option<String>,
    graph: Option<Graph>,
    projection: Projection,
    analysis: Option<AnalysisResult>,
    busy: Arc<AtomicBool>,
}

/// Clears the busy flag when the request finishes, however it finishes.
struct BusyGuard(Arc<AtomicBool>);

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self, SessionError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SessionError::Busy)?;
        Ok(Self(Arc::clone(flag)))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<M: ModelClient> Session<M> {
    pub fn new(analyzer: Analyzer<M>) -> Self {
        Self {
            analyzer,
            palette: EdgePalette::default(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            text: None,
            graph: None,
            projection: Projection::default(),
            analysis: None,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_palette(mut self, palette: EdgePalette) -> Self {
        self.palette = palette;
        self
    }

    /// Text used in reports for empty lists.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Share a busy flag with other observers, e.g. a progress indicator.
    pub fn with_busy_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.busy = flag;
        self
    }

    pub fn busy_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.busy)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The parsed graph, absent when the text does not parse.
    pub fn graph(&self) -> Option<&Graph> {
        self.graph.as_ref()
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    /// Use a previously saved analysis result.
    pub fn set_analysis(&mut self, analysis: AnalysisResult) {
        self.analysis = Some(analysis);
    }

    /// Read an RDF/XML file and make it the current text.
    pub fn load_file(&mut self, path: &Path) -> Result<&Projection, SessionError> {
        let text = std::fs::read_to_string(path).map_err(|source| SessionError::Read {
            path: path.display().to_string(),
            source,
        })?;
        tracing::info!(path = %path.display(), bytes = text.len(), "ontology loaded");
        Ok(self.set_text(text)?)
    }

    /// Replace the text and rebuild the graph and projection.
    ///
    /// The text is kept even when it does not parse, so it can be corrected;
    /// the graph and projection are then empty until it does.
    pub fn set_text(&mut self, text: String) -> Result<&Projection, RdfError> {
        let parsed = rdf::parse(&text, self.analyzer.base_iri());
        self.text = Some(text);
        match parsed {
            Ok(graph) => {
                self.projection = projection::build_with(&graph, &self.palette);
                tracing::debug!(
                    statements = graph.len(),
                    nodes = self.projection.nodes.len(),
                    edges = self.projection.edges.len(),
                    "projection rebuilt"
                );
                self.graph = Some(graph);
                Ok(&self.projection)
            }
            Err(e) => {
                self.graph = None;
                self.projection = Projection::default();
                Err(e)
            }
        }
    }

    /// Current text, provided it parses.
    fn parsed_text(&self) -> Result<&str, SessionError> {
        let text = self.text.as_deref().ok_or(SessionError::NoOntology)?;
        if self.graph.is_none() {
            // Reproduce the parse error for the caller.
            rdf::parse(text, self.analyzer.base_iri())?;
        }
        Ok(text)
    }

    /// Run the four analyses on the current text.
    pub fn analyze(&mut self) -> Result<&AnalysisResult, SessionError> {
        let text = self.parsed_text()?;
        let _busy = BusyGuard::acquire(&self.busy)?;
        let result = self.analyzer.analyze(text);
        Ok(self.analysis.insert(result))
    }

    /// Apply the model's proposed improvements to the current text.
    ///
    /// On failure the current text is left untouched.
    pub fn improve(&mut self) -> Result<&str, SessionError> {
        let text = self.parsed_text()?;
        let analysis = self.analysis.as_ref().ok_or(SessionError::NoAnalysis)?;
        let improved = {
            let _busy = BusyGuard::acquire(&self.busy)?;
            self.analyzer.improve(text, analysis)
        }
        .ok_or(SessionError::ImproveFailed)?;

        let previous = self.text.clone();
        if let Err(e) = self.set_text(improved) {
            tracing::warn!(error = %e, "improved ontology did not re-parse, restoring previous text");
            if let Some(previous) = previous {
                let _ = self.set_text(previous);
            }
            return Err(SessionError::ImproveFailed);
        }
        Ok(self.text.as_deref().unwrap_or_default())
    }

    /// Lay out the current analysis as a report.
    pub fn report(&self) -> Result<Report, SessionError> {
        let analysis = self.analysis.as_ref().ok_or(SessionError::NoAnalysis)?;
        Ok(Report::from_analysis_with(analysis, &self.placeholder))
    }
}
