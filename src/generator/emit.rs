use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info};

use super::format::Formatter;
use super::plan::{plan, PlannedWrite};
use super::templates::{Renderer, TemplateSet};
use super::writer::{write_file, WriteMode};
use crate::error::Result;
use crate::tree::{DroppedReference, RootNode};

/// Order in which rendering, formatting and writing happen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmitStrategy {
    /// Render, format and write one file at a time.
    ///
    /// A failure stops the run; files written before it stay on disk.
    #[default]
    Streaming,
    /// Render and format every file in memory, then write them all.
    ///
    /// A template or formatter failure leaves the output untouched.
    Staged,
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Files written, in emission order
    pub written: Vec<PathBuf>,
    /// Sub-resource references skipped while building the tree
    pub dropped_references: Vec<DroppedReference>,
}

/// Turns an options tree into files on disk
#[derive(Debug, Clone, Default)]
pub struct Generator {
    templates: TemplateSet,
    formatter: Formatter,
    write_mode: WriteMode,
    strategy: EmitStrategy,
}

impl Generator {
    pub fn new(templates: TemplateSet, formatter: Formatter) -> Self {
        Self {
            templates,
            formatter,
            write_mode: WriteMode::default(),
            strategy: EmitStrategy::default(),
        }
    }

    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    pub fn with_strategy(mut self, strategy: EmitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Plan and emit every file for `root`.
    ///
    /// # Errors
    ///
    /// The first template, formatter or I/O error ends the run. What is left
    /// on disk depends on the [`EmitStrategy`].
    pub fn generate(&self, root: &RootNode) -> Result<GenerationReport> {
        let started = Instant::now();
        let written = self.emit(&plan(root))?;
        info!(
            files = written.len(),
            root = %root.location.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "generation complete"
        );
        Ok(GenerationReport {
            written,
            dropped_references: root.dropped_references.clone(),
        })
    }

    /// Apply an already computed plan, returning the files written.
    pub fn emit(&self, writes: &[PlannedWrite]) -> Result<Vec<PathBuf>> {
        let renderer = self.templates.renderer()?;
        match self.strategy {
            EmitStrategy::Streaming => self.emit_streaming(&renderer, writes),
            EmitStrategy::Staged => self.emit_staged(&renderer, writes),
        }
    }

    fn emit_streaming(&self, renderer: &Renderer<'_>, writes: &[PlannedWrite]) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(writes.len());
        for write in writes {
            announce(write);
            let contents = self.produce(renderer, write)?;
            write_file(&write.destination, contents.as_bytes(), self.write_mode)?;
            written.push(write.destination.clone());
        }
        Ok(written)
    }

    fn emit_staged(&self, renderer: &Renderer<'_>, writes: &[PlannedWrite]) -> Result<Vec<PathBuf>> {
        let staged = writes
            .iter()
            .map(|write| {
                announce(write);
                self.produce(renderer, write).map(|contents| (write, contents))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(files = staged.len(), "all files rendered; writing");

        let mut written = Vec::with_capacity(staged.len());
        for (write, contents) in staged {
            write_file(&write.destination, contents.as_bytes(), self.write_mode)?;
            written.push(write.destination.clone());
        }
        Ok(written)
    }

    fn produce(&self, renderer: &Renderer<'_>, write: &PlannedWrite) -> Result<String> {
        let rendered = renderer.render(write.role, &write.context, &write.destination)?;
        self.formatter.format(&rendered, &write.destination)
    }
}

fn announce(write: &PlannedWrite) {
    info!(
        template = write.template(),
        path = %write.destination.display(),
        "generating file"
    );
}
