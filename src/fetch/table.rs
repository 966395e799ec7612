// src/fetch/table.rs

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

use crate::process::raw_table::RawTable;
use crate::process::utils::clean_str;

struct Cell {
    text: String,
    colspan: usize,
    rowspan: usize,
}

/// Parse the first `<table>` matching `selector` out of `html`.
///
/// Leading rows made only of `<th>` cells become header levels; any
/// later row with at least one `<td>` is data. `colspan`/`rowspan` are
/// expanded so every row is addressable by column index.
pub fn parse_table(html: &str, selector: &str) -> Result<RawTable> {
    let doc = Html::parse_document(html);
    let table_sel =
        Selector::parse(selector).map_err(|e| anyhow!("invalid selector {}: {:?}", selector, e))?;
    let tr_sel = Selector::parse("tr").map_err(|e| anyhow!("invalid selector tr: {:?}", e))?;

    let table = doc
        .select(&table_sel)
        .next()
        .ok_or_else(|| anyhow!("no table matching `{}`", selector))?;

    let mut header_rows = Vec::new();
    let mut data_rows = Vec::new();
    for tr in table.select(&tr_sel) {
        let mut cells = Vec::new();
        let mut has_td = false;
        for el in tr.children().filter_map(ElementRef::wrap) {
            let name = el.value().name();
            if name != "th" && name != "td" {
                continue;
            }
            has_td |= name == "td";
            cells.push(Cell {
                text: clean_str(&visible_text(el)),
                colspan: span(el, "colspan"),
                rowspan: span(el, "rowspan"),
            });
        }
        if cells.is_empty() {
            continue;
        }
        if has_td {
            data_rows.push(cells);
        } else if data_rows.is_empty() {
            header_rows.push(cells);
        } else {
            trace!("skipping repeated header row");
        }
    }

    let raw = RawTable {
        header_levels: expand(header_rows),
        rows: expand(data_rows),
    };
    debug!(
        selector,
        header_levels = raw.header_levels.len(),
        rows = raw.rows.len(),
        "parsed table"
    );
    Ok(raw)
}

fn span(el: ElementRef<'_>, attr: &str) -> usize {
    el.value()
        .attr(attr)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(1)
}

/// Text content, skipping `<style>`, `<script>` and `display:none` nodes.
fn visible_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_text(el, &mut out);
    out
}

fn collect_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let v = child_el.value();
            let hidden = matches!(v.name(), "style" | "script")
                || v.attr("style")
                    .map(|s| s.replace(' ', "").contains("display:none"))
                    .unwrap_or(false);
            if !hidden {
                if v.name() == "br" {
                    out.push(' ');
                }
                collect_text(child_el, out);
            }
        }
    }
}

/// Lay spanning cells out on a rectangular grid.
fn expand(rows: Vec<Vec<Cell>>) -> Vec<Vec<String>> {
    // per column: (text, rows still covered)
    let mut carry: Vec<Option<(String, usize)>> = Vec::new();
    let mut out = Vec::with_capacity(rows.len());

    for cells in rows {
        let mut row: Vec<String> = Vec::new();
        for cell in cells {
            fill_carried(&mut carry, &mut row);
            for _ in 0..cell.colspan {
                let col = row.len();
                if carry.len() <= col {
                    carry.resize(col + 1, None);
                }
                if cell.rowspan > 1 {
                    carry[col] = Some((cell.text.clone(), cell.rowspan - 1));
                }
                row.push(cell.text.clone());
            }
        }
        fill_carried(&mut carry, &mut row);
        out.push(row);
    }
    out
}

/// Push values still spanning down into the next free columns of `row`.
fn fill_carried(carry: &mut [Option<(String, usize)>], row: &mut Vec<String>) {
    while let Some(slot) = carry.get_mut(row.len()) {
        let Some((text, left)) = slot.as_mut() else {
            break;
        };
        row.push(text.clone());
        *left -= 1;
        if *left == 0 {
            *slot = None;
        }
    }
}
