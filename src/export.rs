use std::fmt::Write as _;
use std::io;

use crate::data_models::ScoredKeyword;
use crate::recommendations::Recommendations;

pub const CSV_HEADER: [&str; 5] = [
    "Keyword",
    "Search Volume",
    "Difficulty",
    "Competition",
    "Priority Score",
];

/// Writes the keywords as CSV, in the order given, under [`CSV_HEADER`].
pub fn write_csv<W: io::Write>(keywords: &[ScoredKeyword], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for kw in keywords {
        wtr.write_record([
            kw.keyword.clone(),
            kw.search_volume.to_string(),
            kw.difficulty.to_string(),
            format!("{:.2}", kw.competition),
            kw.priority_score.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(keywords: &[ScoredKeyword]) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    write_csv(keywords, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Plain-text table of the first `limit` keywords.
pub fn render_table(keywords: &[ScoredKeyword], limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<40} {:>13} {:>10} {:>11} {:>14}",
        CSV_HEADER[0], CSV_HEADER[1], CSV_HEADER[2], CSV_HEADER[3], CSV_HEADER[4]
    );
    for kw in keywords.iter().take(limit) {
        let _ = writeln!(
            out,
            "{:<40} {:>13} {:>10} {:>11.2} {:>14}",
            kw.keyword, kw.search_volume, kw.difficulty, kw.competition, kw.priority_score
        );
    }
    if keywords.len() > limit {
        let _ = writeln!(out, "... {} more", keywords.len() - limit);
    }
    out
}

/// One line per strategy, e.g. "Top SEO keywords: garden tools (difficulty 64), ...".
pub fn render_recommendations(recs: &Recommendations) -> String {
    fn line(label: &str, items: Vec<String>) -> String {
        if items.is_empty() {
            format!("{label}: none")
        } else {
            format!("{label}: {}", items.join(", "))
        }
    }

    let seo = recs
        .seo
        .iter()
        .map(|kw| format!("{} (difficulty {})", kw.keyword, kw.difficulty))
        .collect();
    let sea = recs
        .sea
        .iter()
        .map(|kw| format!("{} (volume {})", kw.keyword, kw.search_volume))
        .collect();
    let long_tail = recs
        .long_tail
        .iter()
        .map(|kw| format!("{} (priority {})", kw.keyword, kw.priority_score))
        .collect();

    [
        line("Top SEO keywords", seo),
        line("Top SEA keywords", sea),
        line("Long-tail opportunities", long_tail),
    ]
    .join("\n")
}
