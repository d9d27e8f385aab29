// src/formatter.rs
//! Renders job listings into the plain-text block returned to chat clients.
//!
//! Clients split the text on [`SEPARATOR`] and each block on `": "`, so the
//! labels, their order and the separator are a wire contract.

use crate::job_search::JobListing;
use std::fmt::Write;

/// Line closing every rendered listing: 35 dashes, no trailing newline.
pub const SEPARATOR: &str = "-----------------------------------";

/// Render listings in the order given. Absent values render as "".
pub fn render(listings: &[JobListing]) -> String {
    let mut out = String::new();
    for listing in listings {
        render_listing(&mut out, listing);
    }
    out
}

#[cfg(test)]
fn render_one(listing: &JobListing) -> String {
    let mut out = String::new();
    render_listing(&mut out, listing);
    out
}

fn render_listing(out: &mut String, listing: &JobListing) {
    // Writing to a String cannot fail.
    let _ = write!(
        out,
        "ID: {}\n\
         Site: {}\n\
         Job URL: {}\n\
         Title: {}\n\
         Company: {}\n\
         Location: {}\n\
         Date Posted: {}\n\
         Job Type: {}\n\
         Salary: {} - {} {}\n\
         Description: {}\n\
         {}",
        text(&listing.id),
        text(&listing.site),
        text(&listing.job_url),
        text(&listing.title),
        text(&listing.company),
        text(&listing.location),
        text(&listing.date_posted),
        text(&listing.job_type),
        amount(listing.min_amount),
        amount(listing.max_amount),
        text(&listing.currency),
        text(&listing.description),
        SEPARATOR,
    );
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn amount(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        Some(v) if v.is_finite() => v.to_string(),
        _ => String::new(),
    }
}
