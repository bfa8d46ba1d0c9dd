//! Table extraction: turns the published HTML document into ordered table rows.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::TableRow;

/// Extracts classification rows from the HTML edition of the regulation.
///
/// The table lives inside an element whose `id` contains a language code, so the
/// container is located by regex rather than by a fixed id.
#[derive(Debug, Clone)]
pub struct TableExtractor {
    container_id: Regex,
    row_selector: Selector,
    cell_selector: Selector,
    id_selector: Selector,
    header_rows: usize,
}

impl TableExtractor {
    pub fn new(
        container_id_pattern: &str,
        row_selector: &str,
        header_rows: usize,
    ) -> ApplicationResult<Self> {
        let container_id = Regex::new(container_id_pattern).map_err(|e| ApplicationError::Config {
            message: format!("invalid container id pattern {container_id_pattern:?}: {e}"),
        })?;
        Ok(Self {
            container_id,
            row_selector: selector(row_selector)?,
            cell_selector: selector("td")?,
            id_selector: selector("[id]")?,
            header_rows,
        })
    }

    pub fn from_settings(settings: &Settings) -> ApplicationResult<Self> {
        Self::new(
            &settings.container_id_pattern,
            &settings.row_selector,
            settings.header_rows,
        )
    }

    /// Extract the ordered rows of the classification table.
    ///
    /// A cell's text is its rendered text with whitespace runs collapsed to one space.
    /// Rows are numbered from 1 after the skipped header rows.
    #[instrument(level = "debug", skip_all)]
    pub fn extract(&self, html: &str) -> ApplicationResult<Vec<TableRow>> {
        let document = Html::parse_document(html);

        let container = document
            .select(&self.id_selector)
            .find(|el| {
                el.value()
                    .id()
                    .is_some_and(|id| self.container_id.is_match(id))
            })
            .ok_or_else(|| ApplicationError::Extraction {
                message: format!(
                    "no element with id matching {:?}",
                    self.container_id.as_str()
                ),
            })?;
        debug!("extract: container id={:?}", container.value().id());

        let rows = container
            .select(&self.row_selector)
            .skip(self.header_rows)
            .enumerate()
            .map(|(idx, tr)| {
                let cells = tr.select(&self.cell_selector).map(cell_text).collect();
                TableRow::from_cells(idx + 1, cells).map_err(ApplicationError::from)
            })
            .collect::<ApplicationResult<Vec<_>>>()?;

        debug!("extract: {} rows", rows.len());
        Ok(rows)
    }
}

fn selector(css: &str) -> ApplicationResult<Selector> {
    Selector::parse(css).map_err(|e| ApplicationError::Config {
        message: format!("invalid css selector {css:?}: {e}"),
    })
}

fn cell_text(cell: ElementRef<'_>) -> String {
    let text: String = cell.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
