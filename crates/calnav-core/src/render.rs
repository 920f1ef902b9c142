use std::io::{self, IsTerminal, Write};

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::header::{ArrowButton, HeaderLayout};
use crate::picker::{PickerField, PickerSelection};
use crate::view::View;

const TARGET_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    json: bool,
}

impl Renderer {
    pub fn new(cfg: &Config, json: bool) -> Self {
        Self {
            color: cfg.color,
            json,
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    #[tracing::instrument(skip(self, layout))]
    pub fn print_header(&mut self, layout: &HeaderLayout) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        if self.json {
            return write_json(&mut out, layout);
        }

        writeln!(out, "{}", self.header_bar(layout))?;
        writeln!(out)?;

        let headers = vec![
            "Button".to_string(),
            "Target".to_string(),
            "State".to_string(),
        ];
        let rows = layout
            .buttons()
            .map(|button| {
                let target = button
                    .target
                    .map(|date| date.format(TARGET_FORMAT).to_string())
                    .unwrap_or_else(|| "-".to_string());
                let state = if button.disabled {
                    self.paint("disabled", "31")
                } else {
                    self.paint("enabled", "32")
                };
                vec![button.action.to_string(), target, state]
            })
            .collect();
        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    /// One line bar: arrows around the label, disabled controls dimmed.
    pub fn header_bar(&self, layout: &HeaderLayout) -> String {
        let mut label = layout.label.from.clone();
        if let Some(to) = &layout.label.to {
            label.push_str(" – ");
            label.push_str(to);
        }
        let label = format!("[ {label} ]");
        let label = if layout.label.disabled {
            self.paint(&label, "2")
        } else {
            self.paint(&label, "1")
        };

        let mut parts: Vec<String> = layout
            .leading
            .iter()
            .map(|button| self.arrow(button))
            .collect();
        parts.push(label);
        parts.extend(layout.trailing.iter().map(|button| self.arrow(button)));
        parts.join("  ")
    }

    fn arrow(&self, button: &ArrowButton) -> String {
        if button.disabled {
            self.paint(&button.text, "2")
        } else {
            button.text.clone()
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn print_drill_up(&mut self, from: View, to: View) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        if self.json {
            #[derive(Serialize)]
            struct DrillUp {
                from: View,
                to: View,
            }
            return write_json(&mut out, &DrillUp { from, to });
        }
        writeln!(out, "{from} -> {to}")?;
        Ok(())
    }

    #[tracing::instrument(skip(self, selection))]
    pub fn print_selection(
        &mut self,
        step: Option<(PickerField, &str)>,
        selection: &PickerSelection,
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        if self.json {
            return write_json(&mut out, selection);
        }

        let line = self.selection_line(step, selection);
        writeln!(out, "{line}")?;
        Ok(())
    }

    /// One picker step with the selection's weekday, or `-` while the
    /// selection is not a real date.
    fn selection_line(
        &self,
        step: Option<(PickerField, &str)>,
        selection: &PickerSelection,
    ) -> String {
        let changed = match step {
            Some((field, value)) => format!("{field}={value}"),
            None => "initial".to_string(),
        };
        let weekday = selection
            .to_date()
            .map(|date| date.format("%a").to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{:<14} {} {}  ({} days)",
            changed,
            self.paint(&selection.to_string(), "33"),
            weekday,
            selection.day_labels().len()
        )
    }

    pub fn print_days(&mut self, days: &[String]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        if self.json {
            return write_json(&mut out, &days);
        }
        for week in days.chunks(7) {
            writeln!(out, "{}", week.join(" "))?;
        }
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for (header, &width) in headers.iter().zip(&widths) {
        write!(writer, "{header:width$} ")?;
    }
    writeln!(writer)?;

    for &width in &widths {
        write!(writer, "{:-<width$} ", "")?;
    }
    writeln!(writer)?;

    for row in rows {
        for (cell, width) in row.iter().zip(&widths) {
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = width.saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
