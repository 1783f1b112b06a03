use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::NotifierError;
use crate::parser::Project;

/// html parser for pulling project rows off the Mostaql listing page
pub struct ListingParser {
    // CSS selectors for the pieces of a project row
    row_selector: Selector,
    title_link_selector: Selector,
    brief_selector: Selector,
    ticket_icon_selector: Selector,
}

impl ListingParser {
    // set up a parser with css selectors ready
    pub fn new() -> Result<Self, NotifierError> {
        Ok(Self {
            row_selector: Selector::parse("tr.project-row")
                .map_err(|e| NotifierError::ParseError(format!("Invalid row selector: {}", e)))?,
            title_link_selector: Selector::parse("h2 a").map_err(|e| {
                NotifierError::ParseError(format!("Invalid title link selector: {}", e))
            })?,
            brief_selector: Selector::parse("p.project__brief a.details-url").map_err(|e| {
                NotifierError::ParseError(format!("Invalid brief selector: {}", e))
            })?,
            ticket_icon_selector: Selector::parse("i.fa-ticket").map_err(|e| {
                NotifierError::ParseError(format!("Invalid ticket icon selector: {}", e))
            })?,
        })
    }

    /// Pull project records from raw listing HTML, in page order
    /// (newest first). Rows missing the title link or the brief are
    /// dropped, never returned as partial records. Markup that matches
    /// nothing yields an empty vec, not an error.
    pub fn parse_listing(&self, html: &str) -> Vec<Project> {
        let document = Html::parse_document(html);
        let mut projects = Vec::new();

        for row in document.select(&self.row_selector) {
            match self.parse_row(&row) {
                Some(project) => projects.push(project),
                None => debug!("Skipped row missing title link or brief"),
            }
        }

        debug!("Parsed {} projects from listing HTML", projects.len());
        projects
    }

    // handle one project row, None when required fields are missing
    fn parse_row(&self, row: &ElementRef) -> Option<Project> {
        let title_link = row.select(&self.title_link_selector).next()?;
        // the href on the listing page is already an absolute URL
        let link = title_link.value().attr("href")?.trim().to_string();
        let title = collect_text(&title_link);
        if link.is_empty() || title.is_empty() {
            return None;
        }

        let brief = row.select(&self.brief_selector).next()?;
        let description = collect_text(&brief);
        if description.is_empty() {
            return None;
        }

        let offers = self.extract_offers(row);

        Some(Project {
            title,
            link,
            description,
            offers,
        })
    }

    // offer count sits in the list item wrapping the ticket icon
    fn extract_offers(&self, row: &ElementRef) -> String {
        let offers = row
            .select(&self.ticket_icon_selector)
            .next()
            .and_then(|icon| icon.parent())
            .and_then(ElementRef::wrap)
            .map(|parent| collect_text(&parent))
            .unwrap_or_default();

        if offers.is_empty() {
            "0".to_string()
        } else {
            offers
        }
    }
}

// gather descendant text and squeeze whitespace
fn collect_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}
