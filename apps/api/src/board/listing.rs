use std::cmp::Ordering;

use serde::Serialize;

use crate::errors::AppResult;
use crate::models::resume::ResumeListing;
use crate::store::{PortalStore, YearFilter};

/// Everything the Board list renders: the rows plus the three year sets that
/// drive the filter controls.
#[derive(Debug, Serialize)]
pub struct BoardView {
    pub resumes: Vec<BoardResume>,
    pub years_active: Vec<String>,
    pub years_all: Vec<String>,
    pub selected_years: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BoardResume {
    #[serde(flatten)]
    pub listing: ResumeListing,
    pub file_name: Option<String>,
}

impl From<ResumeListing> for BoardResume {
    fn from(listing: ResumeListing) -> Self {
        let file_name = listing
            .file_key
            .as_deref()
            .and_then(|key| key.rsplit('/').next())
            .map(str::to_string);
        Self { listing, file_name }
    }
}

/// Trims, drops blanks, and removes repeats while keeping request order.
pub fn clean_year_params(raw: &[String]) -> Vec<String> {
    let mut years: Vec<String> = Vec::with_capacity(raw.len());
    for year in raw.iter().map(|y| y.trim()).filter(|y| !y.is_empty()) {
        if !years.iter().any(|seen| seen == year) {
            years.push(year.to_string());
        }
    }
    years
}

/// Class year descending, then last name, then first name.
pub fn board_order(a: &ResumeListing, b: &ResumeListing) -> Ordering {
    b.class_year
        .cmp(&a.class_year)
        .then_with(|| a.last_name.cmp(&b.last_name))
        .then_with(|| a.first_name.cmp(&b.first_name))
}

/// Fixed-width numeric labels, so text order is numeric order.
pub fn sort_years_desc(mut years: Vec<String>) -> Vec<String> {
    years.sort_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Resumes matching `filter`, in Board order.
pub async fn load_resumes(
    store: &dyn PortalStore,
    filter: &YearFilter,
) -> AppResult<Vec<ResumeListing>> {
    let mut listings = store.list_resumes(filter).await?;
    listings.sort_by(board_order);
    Ok(listings)
}

/// Builds the Board list. With no year selected the active window is used.
pub async fn load_board_view(
    store: &dyn PortalStore,
    years_active: Vec<String>,
    requested_years: &[String],
) -> AppResult<BoardView> {
    let requested = clean_year_params(requested_years);
    let selected_years = if requested.is_empty() {
        years_active.clone()
    } else {
        requested
    };

    let resumes = load_resumes(store, &YearFilter::Years(selected_years.clone())).await?;
    let years_all = sort_years_desc(store.resume_class_years().await?);

    Ok(BoardView {
        resumes: resumes.into_iter().map(BoardResume::from).collect(),
        years_active,
        years_all,
        selected_years,
    })
}
