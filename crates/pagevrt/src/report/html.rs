use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

use crate::store::{self, PagePaths};

pub const OUTPUT_FILE: &str = "report.html";

/// One page that needs review.
struct ReviewRow {
    stem: String,
    has_master: bool,
    has_compared: bool,
}

/// Written report and what it contains.
pub struct ReportSummary {
    pub path: PathBuf,
    pub diff_count: usize,
    pub new_count: usize,
}

/// Pages with an overlay (failed) first, then pages with no master (new).
fn collect_rows(folder: &Path) -> Vec<ReviewRow> {
    let masters = store::list_master_stems(folder);
    let mut failed = Vec::new();
    let mut new = Vec::new();
    for stem in store::list_actual_stems(folder) {
        let paths = PagePaths::from_stem(folder, &stem);
        let row = ReviewRow {
            has_master: masters.contains(&stem),
            has_compared: paths.compared.is_file(),
            stem,
        };
        if row.has_compared {
            failed.push(row);
        } else if !row.has_master {
            new.push(row);
        }
    }
    failed.extend(new);
    failed
}

fn build_html(rows: &[ReviewRow], created_at: &str) -> String {
    let mut body_rows = String::new();
    for row in rows {
        let badge = if row.has_master {
            ""
        } else {
            r#" <span class="badge new">NEW</span>"#
        };
        let master = if row.has_master {
            image_cell("master", &format!("{}{}", row.stem, store::MASTER_SUFFIX))
        } else {
            r#"<div class="missing">no master</div>"#.to_string()
        };
        let actual_file = format!("{}{}", row.stem, store::ACTUAL_SUFFIX);
        let compared = if row.has_compared {
            image_cell(
                "compared",
                &format!("{actual_file}{}", store::COMPARED_SUFFIX),
            )
        } else {
            r#"<div class="missing">&ndash;</div>"#.to_string()
        };
        body_rows.push_str(&format!(
            r#"        <tr>
          <td class="name">{name}{badge}</td>
          <td>{master}</td>
          <td>{actual}</td>
          <td>{compared}</td>
        </tr>
"#,
            name = html_escape(&row.stem),
            actual = image_cell("actual", &actual_file),
        ));
    }

    let diff_count = rows.iter().filter(|r| r.has_compared).count();
    let new_count = rows.len() - diff_count;

    let content = if body_rows.is_empty() {
        r#"<div class="empty">All pages pass, nothing to review.</div>"#.to_string()
    } else {
        format!(
            r#"<table>
    <thead>
      <tr>
        <th>Page</th>
        <th>Master</th>
        <th>Actual</th>
        <th>Differences</th>
      </tr>
    </thead>
    <tbody>
{body_rows}    </tbody>
  </table>"#
        )
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <title>pagevrt review</title>
  <style>
    :root {{ color-scheme: light; }}
    body {{
      font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif;
      margin: 0; padding: 24px;
      background: #f6f7f9; color: #1f2933;
    }}
    h1 {{ margin: 0 0 8px; font-size: 22px; }}
    .meta {{ margin-bottom: 16px; color: #52606d; font-size: 14px; }}
    table {{ width: 100%; border-collapse: collapse; background: #fff; }}
    th, td {{ border: 1px solid #e4e7eb; padding: 8px; vertical-align: top; text-align: left; width: 25%; }}
    th {{ background: #f0f4f8; font-weight: 600; font-size: 14px; }}
    td img {{ max-width: 100%; height: auto; display: block; }}
    td.name {{ font-size: 13px; word-break: break-word; }}
    .missing {{ color: #c81e1e; font-style: italic; font-size: 13px; }}
    .badge {{ font-size: 11px; padding: 1px 6px; border-radius: 3px; font-weight: 600; }}
    .badge.new {{ background: #fef3c7; color: #92400e; }}
    .empty {{ text-align: center; padding: 48px; color: #52606d; font-size: 16px; }}
  </style>
</head>
<body>
  <h1>pagevrt review</h1>
  <div class="meta">Generated at {created_at} &middot; {diff_count} with differences, {new_count} new</div>
  {content}
</body>
</html>"##
    )
}

fn image_cell(kind: &str, file: &str) -> String {
    format!(
        r#"<img src="{src}" alt="{kind} {alt}" loading="lazy" />"#,
        src = url_encode(file),
        alt = html_escape(file),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn url_encode(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                String::from(b as char)
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

/// UTC timestamp for the report header.
fn timestamp(now: SystemTime) -> String {
    let secs = now.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    let (s, m, h) = (secs % 60, (secs / 60) % 60, (secs / 3600) % 24);
    let (y, mo, d) = civil_from_days(secs / 86400);
    format!("{y:04}-{mo:02}-{d:02}T{h:02}:{m:02}:{s:02}Z")
}

/// Days since the Unix epoch to a (year, month, day) civil date.
fn civil_from_days(days: u64) -> (u64, u64, u64) {
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = yoe + era * 400 + u64::from(m <= 2);
    (y, m, d)
}

/// Write `<folder>/report.html` covering every failed and new page.
pub fn generate(folder: &Path) -> Result<ReportSummary> {
    let rows = collect_rows(folder);
    let html = build_html(&rows, &timestamp(SystemTime::now()));

    let path = folder.join(OUTPUT_FILE);
    std::fs::write(&path, html).with_context(|| format!("Failed to write {}", path.display()))?;

    let diff_count = rows.iter().filter(|r| r.has_compared).count();
    Ok(ReportSummary {
        path,
        diff_count,
        new_count: rows.len() - diff_count,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use image::{Rgba, RgbaImage};

    use super::*;

    fn page(folder: &Path, stem: &str, master: bool, actual: bool, compared: bool) {
        let img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        let p = PagePaths::from_stem(folder, stem);
        for (wanted, path) in [(master, &p.master), (actual, &p.actual), (compared, &p.compared)] {
            if wanted {
                store::write_png(path, &img).unwrap();
            }
        }
    }

    #[test]
    fn report_lists_failed_then_new_and_skips_passing() {
        let dir = tempfile::tempdir().unwrap();
        let f = dir.path();
        page(f, "pass.svg", true, true, false);
        page(f, "fresh.svg", false, true, false);
        page(f, "broken.svg", true, true, true);

        let summary = generate(f).unwrap();
        assert_eq!((summary.diff_count, summary.new_count), (1, 1));
        assert_eq!(summary.path, f.join(OUTPUT_FILE));

        let html = std::fs::read_to_string(&summary.path).unwrap();
        assert!(html.contains(r#"src="broken.svg.png.compared.png""#));
        assert!(html.contains(r#"src="broken.svg.master.png""#));
        assert!(html.contains(r#"src="fresh.svg.png""#));
        assert!(!html.contains("pass.svg"));
        assert!(html.find("broken.svg").unwrap() < html.find("fresh.svg").unwrap());
    }

    #[test]
    fn empty_report_says_nothing_to_review() {
        let dir = tempfile::tempdir().unwrap();
        let summary = generate(dir.path()).unwrap();
        let html = std::fs::read_to_string(summary.path).unwrap();
        assert!(html.contains("nothing to review"));
    }

    #[test]
    fn names_are_escaped_in_markup_and_urls() {
        assert_eq!(html_escape("a<b>&\""), "a&lt;b&gt;&amp;&quot;");
        assert_eq!(url_encode("dir/a b#.png"), "dir/a%20b%23.png");
    }

    #[test]
    fn timestamps_are_utc_civil_dates() {
        let t = UNIX_EPOCH + Duration::from_secs(951_782_400 + 3_661);
        assert_eq!(timestamp(t), "2000-02-29T01:01:01Z");
        assert_eq!(timestamp(UNIX_EPOCH), "1970-01-01T00:00:00Z");
    }
}
