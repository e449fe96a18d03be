use std::fmt::Write;

use crate::document::{Document, Event, Week};
use crate::grid::{layout_week, Cell, Row};
use crate::layout::{DAYS, DAY_TITLES};

const STYLESHEET: &str = "body{font-family:system-ui,sans-serif;margin:24px;background:#f6f7f9;color:#1f2430;}\
header h1{margin:0 0 4px;font-size:1.4rem;}\
nav.weeks{margin:8px 0;}\
nav.weeks a{display:inline-block;margin-right:8px;padding:4px 10px;border-radius:6px;\
background:#e2e6ee;color:#1f2430;text-decoration:none;font-size:0.9rem;}\
nav.weeks a.active{background:#33527a;color:#fff;}\
p.range{margin:4px 0 16px;color:#5a6275;}\
table{border-collapse:collapse;width:100%;background:#fff;}\
th,td{border:1px solid #ccd2de;padding:6px 8px;vertical-align:top;font-size:0.85rem;}\
th{background:#eef1f6;text-align:left;}\
th span.date{display:block;font-weight:normal;color:#5a6275;font-size:0.75rem;}\
td.slot,th.slot{white-space:nowrap;width:1%;color:#5a6275;}\
tr.break td{background:#f0e9d8;text-align:center;font-weight:bold;color:#6b5d33;}\
td.has-event{padding:0;}\
div.tcell-fill{padding:6px 8px;height:100%;}\
div.split-wrap{display:flex;}\
div.split-wrap div.col{flex:1 1 0;padding:6px 8px;}\
div.split-wrap div.col+div.col{border-left:1px solid #ccd2de;}\
div.title{font-weight:bold;}\
div.meta{color:inherit;opacity:0.8;font-size:0.8rem;}\
div.badge{display:inline-block;margin-top:4px;padding:1px 6px;border-radius:4px;\
background:rgba(0,0,0,0.15);font-size:0.7rem;}\
p.notice{padding:12px;background:#fdeaea;border:1px solid #e4b6b6;border-radius:6px;}";

/// Minimal HTML entity escaping for untrusted document content.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the full page for one week. Returns `None` when the requested key
/// is not present in the document, leaving the caller's current page as is.
pub fn render_page(document: &Document, selected: &str) -> Option<String> {
    let week = document.week(selected)?;
    let title = week.label.as_deref().unwrap_or(selected);

    let mut out = String::with_capacity(8192);
    page_head(&mut out, &format!("Timetable – {}", escape(title)));

    let _ = writeln!(out, "<header>");
    let _ = writeln!(out, "  <h1>Weekly Timetable</h1>");
    week_nav(&mut out, document, selected);
    let _ = writeln!(
        out,
        "  <p class=\"range\" id=\"weekDates\">{}</p>",
        escape(week.range.as_deref().unwrap_or(""))
    );
    let _ = writeln!(out, "</header>");

    let _ = writeln!(out, "<table id=\"timetable\">");
    week_header(&mut out, week);
    let _ = writeln!(out, "<tbody>");
    out.push_str(&render_rows(&layout_week(week)));
    let _ = writeln!(out, "</tbody>");
    let _ = writeln!(out, "</table>");

    page_foot(&mut out);
    Some(out)
}

/// The page shown when there is no week to render: nothing loaded yet, or a
/// document whose `weeks` mapping is empty.
pub fn notice_page(notice: &str) -> String {
    let mut out = String::with_capacity(1024);
    page_head(&mut out, "Timetable");
    let _ = writeln!(out, "<header><h1>Weekly Timetable</h1></header>");
    let _ = writeln!(out, "<p class=\"notice\">{}</p>", escape(notice));
    page_foot(&mut out);
    out
}

pub const NOTHING_LOADED: &str =
    "No timetable loaded. Supply a JSON document with a top-level `weeks` mapping via POST /load.";

pub const NO_WEEKS: &str = "The loaded timetable has no weeks.";

fn page_head(out: &mut String, title: &str) {
    let _ = writeln!(out, "<!doctype html>");
    let _ = writeln!(out, "<html lang=\"en\">");
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, "<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>{title}</title>");
    let _ = writeln!(out, "<style>{STYLESHEET}</style>");
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body>");
}

fn page_foot(out: &mut String) {
    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");
}

fn week_nav(out: &mut String, document: &Document, selected: &str) {
    let _ = writeln!(out, "  <nav class=\"weeks\">");

    for key in document.sorted_keys() {
        let Some(week) = document.week(key) else {
            continue;
        };
        let label = week.label.as_deref().unwrap_or(key);
        let class = if key == selected { "week active" } else { "week" };

        let _ = writeln!(
            out,
            "    <a class=\"{class}\" href=\"/?week={}\">{}</a>",
            escape(key),
            escape(label)
        );
    }

    let _ = writeln!(out, "  </nav>");
}

fn week_header(out: &mut String, week: &Week) {
    let _ = writeln!(out, "<thead>");
    let _ = write!(out, "<tr><th class=\"slot\">Time</th>");

    for (day_key, day_title) in DAYS.iter().zip(DAY_TITLES) {
        let date = week
            .day(day_key)
            .and_then(|day| day.date.as_deref())
            .unwrap_or("");

        let _ = write!(
            out,
            "<th>{day_title}<span class=\"date\">{}</span></th>",
            escape(date)
        );
    }

    let _ = writeln!(out, "</tr>");
    let _ = writeln!(out, "</thead>");
}

fn render_rows(rows: &[Row]) -> String {
    let mut out = String::with_capacity(4096);

    for row in rows {
        match row {
            Row::Slots { label, cells } => {
                let _ = write!(
                    out,
                    "<tr class=\"slot-row\"><td class=\"slot\">{}</td>",
                    escape(label)
                );
                for cell in cells {
                    render_cell(&mut out, cell);
                }
                let _ = writeln!(out, "</tr>");
            }
            Row::Break { time, label } => {
                let _ = writeln!(
                    out,
                    "<tr class=\"break\"><td class=\"slot\">{time}</td>\
                     <td colspan=\"{}\">{label}</td></tr>",
                    DAYS.len()
                );
            }
        }
    }

    out
}

fn render_cell(out: &mut String, cell: &Cell) {
    match cell {
        Cell::Empty => {
            let _ = write!(out, "<td></td>");
        }
        Cell::Text(text) => {
            let _ = write!(out, "<td>{}</td>", escape(text));
        }
        Cell::Block { rowspan, entries } => {
            let mut classes = String::from("has-event");
            if *rowspan > 1 {
                classes.push_str(" merged");
            }
            if entries.len() > 1 {
                classes.push_str(" split");
            }

            let _ = write!(out, "<td class=\"{classes}\"");
            if *rowspan > 1 {
                let _ = write!(out, " rowspan=\"{rowspan}\"");
            }
            let _ = write!(out, ">");

            if entries.len() > 1 {
                let _ = write!(out, "<div class=\"split-wrap\">");
                for entry in entries {
                    render_entry(out, entry, "col");
                }
                let _ = write!(out, "</div>");
            } else {
                render_entry(out, &entries[0], "tcell-fill");
            }

            let _ = write!(out, "</td>");
        }
    }
}

fn render_entry(out: &mut String, entry: &Event, class: &str) {
    let _ = write!(out, "<div class=\"{class}\"");
    if let Some(color) = &entry.color {
        let _ = write!(out, " style=\"background:{};color:#fff\"", escape(color));
    }
    let _ = write!(out, ">");

    let _ = write!(
        out,
        "<div class=\"title\">{}</div>",
        escape(entry.title.as_deref().unwrap_or(""))
    );
    let _ = write!(
        out,
        "<div class=\"meta\">{}</div>",
        escape(entry.meta.as_deref().unwrap_or(""))
    );
    if let Some(tag) = &entry.tag {
        let _ = write!(out, "<div class=\"badge\">{}</div>", escape(tag));
    }

    let _ = write!(out, "</div>");
}
