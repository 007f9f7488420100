// src/ingest/providers/html_table.rs
use anyhow::Result;
use async_trait::async_trait;
use metrics::{counter, histogram};
use once_cell::sync::Lazy;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use super::{http_client, transport_error, PREVIEW_CHARS};
use crate::config::SourceConfig;
use crate::ingest::normalize::{clean_text, parse_count_str};
use crate::ingest::types::{body_preview, RawRecord, SourceAdapter, SourceError};

const NAME: &str = "HtmlTable";

/// Minimum cells (`td` or `th`) for a row to count as a country row.
pub const MIN_CELLS: usize = 5;

/// Tried in order; the first table yielding rows wins.
const TABLE_SELECTORS: &[&str] = &[
    "table#medals",
    "#medals table",
    "table.medals",
    "[id*=\"medals\"] table",
    "[class*=\"medals\"] table",
    "table",
];

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("static selector"));
static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img").expect("static selector"));

/// Public medals page, scraped with browser-like headers.
pub struct HtmlTableAdapter {
    http: reqwest::Client,
    url: String,
}

impl HtmlTableAdapter {
    pub fn from_config(cfg: &SourceConfig) -> Result<Self> {
        Ok(Self {
            http: http_client(cfg, &cfg.user_agent)?,
            url: cfg.page_url.clone(),
        })
    }

    /// Extract one record per country row of the medals table.
    ///
    /// No `table` element at all is a schema error; tables without any usable
    /// row give `Ok(vec![])`.
    pub fn parse_html(html: &str) -> Result<Vec<RawRecord>> {
        let t0 = std::time::Instant::now();
        let doc = Html::parse_document(html);

        let mut saw_table = false;
        let mut out = Vec::new();
        'search: for css in TABLE_SELECTORS {
            let Ok(sel) = Selector::parse(css) else {
                continue;
            };
            for table in doc.select(&sel) {
                saw_table = true;
                let rows = extract_rows(table);
                if !rows.is_empty() {
                    out = rows;
                    break 'search;
                }
            }
        }

        histogram!("standings_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        if !saw_table {
            return Err(SourceError::Schema("no table found in page".to_string()).into());
        }
        Ok(out)
    }
}

enum Row {
    Data(RawRecord),
    /// Only `th` cells (column headings).
    Header,
    /// Fewer than `MIN_CELLS` cells.
    Short,
}

fn extract_rows(table: ElementRef<'_>) -> Vec<RawRecord> {
    let mut out = Vec::new();
    let mut skipped = 0u64;
    for tr in table.select(&ROW) {
        match extract_row(tr) {
            Row::Data(rec) => out.push(rec),
            Row::Short => skipped += 1,
            Row::Header => {}
        }
    }
    if skipped > 0 {
        counter!("standings_rows_skipped_total").increment(skipped);
    }
    out
}

/// Row cells are its direct `td`/`th` children, so a `<th scope="row">`
/// country cell keeps the columns aligned.
fn extract_row(tr: ElementRef<'_>) -> Row {
    let cells: Vec<ElementRef<'_>> = tr
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .collect();
    if !cells.is_empty() && cells.iter().all(|c| c.value().name() == "th") {
        return Row::Header;
    }
    if cells.len() < MIN_CELLS {
        return Row::Short;
    }

    let mut rec = RawRecord::new();
    let country = cell_text(cells[1]);
    if !country.is_empty() {
        rec.insert("country".to_string(), Value::String(country));
    }
    if let Some(flag) = flag_src(cells[1]) {
        rec.insert("flag_url".to_string(), Value::String(flag));
    }
    for (key, cell) in [("gold", cells[2]), ("silver", cells[3]), ("bronze", cells[4])] {
        let n = parse_count_str(&cell_text(cell)).unwrap_or(0);
        rec.insert(key.to_string(), Value::from(n));
    }
    if let Some(total) = cells.get(5).and_then(|c| parse_count_str(&cell_text(*c))) {
        rec.insert("total".to_string(), Value::from(total));
    }
    Row::Data(rec)
}

fn cell_text(cell: ElementRef<'_>) -> String {
    clean_text(&cell.text().collect::<String>())
}

fn flag_src(cell: ElementRef<'_>) -> Option<String> {
    let img = cell.select(&IMG).next()?;
    ["src", "data-src"]
        .iter()
        .filter_map(|a| img.value().attr(a))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl SourceAdapter for HtmlTableAdapter {
    async fn fetch_records(&self) -> Result<Vec<RawRecord>> {
        let resp = self
            .http
            .get(&self.url)
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        let body = resp.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
                preview: body_preview(&body, PREVIEW_CHARS),
            }
            .into());
        }

        Self::parse_html(&body)
    }

    fn name(&self) -> &'static str {
        NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <table class="schedule"><tr><td>1</td><td>2</td><td>3</td><td>4</td><td>5</td></tr></table>
          <div id="medals-table">
            <table>
              <thead><tr><th>#</th><th>Country</th><th>G</th><th>S</th><th>B</th><th>T</th></tr></thead>
              <tbody>
                <tr><td>1</td><td><img src="https://flags.test/no.svg"> Norway </td><td>16</td><td>8</td><td>13</td><td>37</td></tr>
                <tr><td>2</td><td><img data-src="/de.svg"/>Germany</td><td>12</td><td>10</td><td>5</td></tr>
                <tr><td>3</td><td>Broken</td><td>1</td></tr>
                <tr><td>4</td><td>Canada</td><td>–</td><td>n/a</td><td>7</td><td></td></tr>
              </tbody>
            </table>
          </div>
        </body></html>
    "#;

    #[test]
    fn prefers_medals_scoped_table() {
        let rows = HtmlTableAdapter::parse_html(PAGE).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["country"], "Norway");
        assert_eq!(rows[0]["flag_url"], "https://flags.test/no.svg");
        assert_eq!(rows[0]["gold"], 16);
        assert_eq!(rows[0]["total"], 37);
        assert_eq!(rows[1]["flag_url"], "/de.svg");
        assert!(rows[1].get("total").is_none());
    }

    #[test]
    fn short_rows_are_skipped_entirely() {
        let rows = HtmlTableAdapter::parse_html(PAGE).unwrap();
        assert!(rows.iter().all(|r| r["country"] != "Broken"));
    }

    #[test]
    fn non_numeric_cells_parse_to_zero() {
        let rows = HtmlTableAdapter::parse_html(PAGE).unwrap();
        let canada = &rows[2];
        assert_eq!(canada["gold"], 0);
        assert_eq!(canada["silver"], 0);
        assert_eq!(canada["bronze"], 7);
        assert!(canada.get("flag_url").is_none());
    }

    #[test]
    fn row_header_country_cell_keeps_columns_aligned() {
        let html = r#"<table id="medals">
            <tr><th>Rank</th><th>Nation</th><th>Gold</th><th>Silver</th><th>Bronze</th><th>Total</th></tr>
            <tr><td>1</td><th scope="row"><img src="/no.svg"> Norway</th><td>16</td><td>8</td><td>13</td><td>37</td></tr>
        </table>"#;
        let rows = HtmlTableAdapter::parse_html(html).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["country"], "Norway");
        assert_eq!(rows[0]["flag_url"], "/no.svg");
        assert_eq!(rows[0]["gold"], 16);
        assert_eq!(rows[0]["silver"], 8);
        assert_eq!(rows[0]["bronze"], 13);
        assert_eq!(rows[0]["total"], 37);
    }

    #[test]
    fn header_rows_are_not_short_rows() {
        let doc = Html::parse_fragment(
            "<table><tr><th>a</th><th>b</th></tr><tr><td>1</td><td>x</td></tr></table>",
        );
        let rows: Vec<_> = doc.select(&ROW).map(extract_row).collect();
        assert!(matches!(rows[0], Row::Header));
        assert!(matches!(rows[1], Row::Short));
    }

    #[test]
    fn falls_back_to_any_table() {
        let html = "<table><tr><td>1</td><td>Italy</td><td>2</td><td>3</td><td>4</td></tr></table>";
        let rows = HtmlTableAdapter::parse_html(html).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["country"], "Italy");
    }

    #[test]
    fn page_without_table_is_schema_error() {
        let err = HtmlTableAdapter::parse_html("<p>maintenance</p>").unwrap_err();
        assert_eq!(crate::ingest::types::failure_kind(&err), "schema");
    }

    #[test]
    fn table_without_country_rows_is_empty() {
        let html = "<table><tr><th>Country</th></tr><tr><td>a</td><td>b</td></tr></table>";
        assert!(HtmlTableAdapter::parse_html(html).unwrap().is_empty());
    }
}
