//! Output formatting for CLI display.

use dayone::Entry;

/// Longest title shown in a listing line before it is cut off.
const TITLE_WIDTH: usize = 60;

/// One listing line: identity, creation date, star, and title.
pub(super) fn format_entry_line(entry: &Entry) -> String {
    let date = entry
        .creation_date
        .map_or_else(|| "-".repeat(20), |t| t.strftime("%Y-%m-%dT%H:%M:%SZ").to_string());
    let star = if entry.starred { '*' } else { ' ' };
    format!(
        "{}  {date} {star} {}",
        entry.identity(),
        title(&entry.text)
    )
}

/// The first non-empty line of `text`, without markdown heading marks.
fn title(text: &str) -> String {
    let line = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .trim_start_matches('#')
        .trim_start();

    if line.chars().count() > TITLE_WIDTH {
        let cut: String = line.chars().take(TITLE_WIDTH - 1).collect();
        format!("{cut}…")
    } else {
        line.to_string()
    }
}

/// Human-readable byte count.
#[allow(clippy::cast_precision_loss)]
pub(super) fn format_bytes(n: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    match n {
        n if n >= MIB => format!("{:.1} MiB", n as f64 / MIB as f64),
        n if n >= KIB => format!("{:.1} KiB", n as f64 / KIB as f64),
        n => format!("{n} B"),
    }
}
