//! Hierarchy builder: folds ordered table rows into a forest of sections.
//!
//! The source table carries no parent references. A row's place in the tree follows
//! from its level and from the rows before it: divisions belong to the last section,
//! groups to the last division, classes to the last group.

use tracing::{debug, instrument, trace};

use crate::domain::entities::{ClassificationCode, Level, TableRow};
use crate::domain::error::{DomainError, DomainResult, StructuralError};
use crate::domain::section::SectionMarkerParser;

/// Constructs the classification forest from table rows.
pub struct HierarchyBuilder<P> {
    section_parser: P,
}

impl<P: SectionMarkerParser> HierarchyBuilder<P> {
    pub fn new(section_parser: P) -> Self {
        Self { section_parser }
    }

    /// Classify one row, reading section marker rows through the section parser.
    pub fn classify_row(&self, row: &TableRow) -> DomainResult<ClassificationCode> {
        if row.is_section_marker() {
            let marker = self.section_parser.parse(&row.description)?;
            if !marker.has_valid_letter() {
                return Err(DomainError::UnrecognizedSectionFormat {
                    text: row.description.clone(),
                });
            }
            ClassificationCode::section(&marker.letter, &marker.title)
        } else {
            ClassificationCode::new(&row.code(), &row.description)
        }
    }

    /// Build the forest in a single left-to-right pass.
    ///
    /// Any error aborts the build; no partial forest is returned. Row numbers in
    /// errors are 1-based positions in `rows`.
    #[instrument(level = "debug", skip_all)]
    pub fn build<I>(&self, rows: I) -> DomainResult<Vec<ClassificationCode>>
    where
        I: IntoIterator<Item = TableRow>,
    {
        let state = rows.into_iter().enumerate().try_fold(
            BuildState::default(),
            |state, (idx, row)| {
                let row_no = idx + 1;
                let node = self
                    .classify_row(&row)
                    .map_err(|e| e.at_row(row_no))?;
                state.accept(node).map_err(|e| e.at_row(row_no))
            },
        )?;
        let forest = state.finish();
        debug!("build: {} sections", forest.len());
        Ok(forest)
    }
}

/// Accumulator threaded through the fold.
///
/// Holds the open section, division and group. A node stays in its slot until a node of
/// the same or a higher level arrives, then it is moved into its parent's children.
#[derive(Debug, Default)]
pub struct BuildState {
    section: Option<ClassificationCode>,
    division: Option<ClassificationCode>,
    group: Option<ClassificationCode>,
    completed: Vec<ClassificationCode>,
}

impl BuildState {
    /// Feed one classified node.
    pub fn accept(mut self, node: ClassificationCode) -> DomainResult<Self> {
        trace!("accept: {} {}", node.level, node.raw_code);
        match node.level {
            Level::Section => {
                self.close_section();
                self.section = Some(node);
            }
            Level::Division => {
                if self.section.is_none() {
                    return Err(missing_parent(&node));
                }
                self.close_division();
                self.division = Some(node);
            }
            Level::Group => {
                if self.division.is_none() {
                    return Err(missing_parent(&node));
                }
                self.close_group();
                self.group = Some(node);
            }
            Level::Class => match self.group.as_mut() {
                Some(group) => group.children.push(node),
                None => return Err(missing_parent(&node)),
            },
        }
        Ok(self)
    }

    /// Flush the open section and return the completed forest.
    pub fn finish(mut self) -> Vec<ClassificationCode> {
        self.close_section();
        self.completed
    }

    /// Deepest level that currently has an open node.
    pub fn open_level(&self) -> Option<Level> {
        if self.group.is_some() {
            Some(Level::Group)
        } else if self.division.is_some() {
            Some(Level::Division)
        } else if self.section.is_some() {
            Some(Level::Section)
        } else {
            None
        }
    }

    /// Sections already closed by a later section.
    pub fn completed(&self) -> &[ClassificationCode] {
        &self.completed
    }

    fn close_group(&mut self) {
        // A group is only ever opened below an open division.
        if let (Some(group), Some(division)) = (self.group.take(), self.division.as_mut()) {
            division.children.push(group);
        }
    }

    fn close_division(&mut self) {
        self.close_group();
        if let (Some(division), Some(section)) = (self.division.take(), self.section.as_mut()) {
            section.children.push(division);
        }
    }

    fn close_section(&mut self) {
        self.close_division();
        if let Some(section) = self.section.take() {
            self.completed.push(section);
        }
    }
}

fn missing_parent(node: &ClassificationCode) -> DomainError {
    let parent = node.level.parent().unwrap_or(Level::Section);
    StructuralError::MissingParent {
        row: 0,
        code: node.raw_code.clone(),
        level: node.level,
        parent,
    }
    .into()
}
