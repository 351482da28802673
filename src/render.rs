use unicode_width::UnicodeWidthStr;

use crate::covers::Covers;
use crate::openlibrary::SearchResponse;

const HEADERS: [&str; 5] = ["Title", "Authors", "Cover", "Thumbnail", "Full size"];

/// Renders a results table, one row per book in server order.
pub fn render_results(results: &SearchResponse, covers: &Covers) -> String {
    let rows = results
        .docs
        .iter()
        .map(|book| {
            [
                book.title.clone(),
                book.authors(),
                book.cover_edition_key.clone().unwrap_or_default(),
                book.thumbnail_url(covers).unwrap_or_default(),
                book.cover_url(covers).unwrap_or_default(),
            ]
            .map(|cell| single_line(&cell))
        })
        .collect::<Vec<_>>();

    let mut widths = HEADERS.map(|h| h.width());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let mut out = format!(
        "Showing {} results of {}\n",
        results.docs.len(),
        results.num_found
    );
    out.push_str(&line(&HEADERS.map(str::to_owned), &widths));
    out.push_str(&line(&widths.map(|w| "-".repeat(w)), &widths));
    for row in &rows {
        out.push_str(&line(row, &widths));
    }
    out
}

/// Payload strings may carry line breaks or tabs; a row must stay one line.
fn single_line(cell: &str) -> String {
    cell.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn line(cells: &[String; 5], widths: &[usize; 5]) -> String {
    let padded = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width - cell.width();
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>();
    format!("{}\n", padded.join(" | ").trim_end())
}
