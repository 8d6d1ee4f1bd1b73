use askama::Template;
use mb_core::{AppError, ListingFilter, PropertyView};

pub const SITE_TITLE: &str = "MongoBnB";

/// One entry of the selector bar on the home grid.
pub struct FilterLink {
    /// `filter` query value, `None` for the default selector
    pub query: Option<&'static str>,
    pub label: &'static str,
    pub active: bool,
}

pub fn filter_links(active: ListingFilter) -> Vec<FilterLink> {
    ListingFilter::ALL
        .into_iter()
        .map(|filter| FilterLink {
            query: filter.query_value(),
            label: filter.label(),
            active: filter == active,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub title: &'a str,
    pub heading: &'a str,
    pub filters: &'a [FilterLink],
    pub listings: &'a [PropertyView],
}

#[derive(Template)]
#[template(path = "listing.html")]
pub struct ListingTemplate<'a> {
    pub title: &'a str,
    pub property: &'a PropertyView,
}

#[derive(Template)]
#[template(path = "confirmation.html")]
pub struct ConfirmationTemplate<'a> {
    pub title: &'a str,
    pub booking_id: &'a str,
    pub listing_id: &'a str,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub title: &'a str,
    pub status: u16,
    pub message: &'a str,
}

/// Reply document understood by SMS gateways; its message is sent back to the
/// author of the inbound text.
#[derive(Template)]
#[template(path = "sms_reply.xml")]
pub struct SmsReplyTemplate<'a> {
    pub message: &'a str,
}

/// Renders any template, mapping failures into the core error type.
pub fn render<T: Template>(template: &T) -> Result<String, AppError> {
    template.render().map_err(|e| AppError::Render(e.to_string()))
}
