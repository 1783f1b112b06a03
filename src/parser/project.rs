/// One project posting pulled from the listing page.
///
/// The link is the natural key: it is the absolute project URL and is what
/// the seen-set stores. A `Project` is only constructed when both the
/// title-link and the description were present in the source row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Offer count as shown on the page, `"0"` when the marker is absent.
    pub offers: String,
}
