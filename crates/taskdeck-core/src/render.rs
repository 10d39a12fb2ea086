use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::task::{Status, Task};
use crate::view::BoardView;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color })
    }

    /// Print the three columns: a `Name (count)` header per column,
    /// then an aligned card table. The active tab's header is bold.
    #[tracing::instrument(skip(self, view))]
    pub fn print_board(&mut self, view: &BoardView) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        for column in &view.columns {
            let header = format!("{} ({})", column.status, column.count);
            let code = if column.status == view.active {
                "1;36"
            } else {
                "36"
            };
            writeln!(out, "{}", self.paint(&header, code))?;

            if column.tasks.is_empty() {
                writeln!(out, "  (no tasks)")?;
                writeln!(out)?;
                continue;
            }

            let headers = vec![
                "ID".to_string(),
                "Due".to_string(),
                "Pri".to_string(),
                "Subject".to_string(),
                "Title".to_string(),
                "Description".to_string(),
            ];

            let mut rows = Vec::with_capacity(column.tasks.len());
            for task in &column.tasks {
                let id = self.paint(&short_id(task), "33");

                let due = sanitize(&task.due_date);
                let due = if column.status == Status::OverDue {
                    self.paint(&due, "31")
                } else {
                    due
                };

                rows.push(vec![
                    id,
                    due,
                    sanitize(&task.priority),
                    sanitize(&task.subject),
                    sanitize(&task.title),
                    sanitize(&task.description),
                ]);
            }

            write_table(&mut out, headers, rows)?;
            writeln!(out)?;
        }

        Ok(())
    }

    /// One task in full, key/value lines.
    #[tracing::instrument(skip(self, task))]
    pub fn print_task(&mut self, task: &Task) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        writeln!(out, "id        {}", task.id)?;
        writeln!(out, "title     {}", sanitize(&task.title))?;
        writeln!(out, "desc      {}", sanitize(&task.description))?;
        writeln!(out, "due       {}", sanitize(&task.due_date))?;
        writeln!(out, "subject   {}", sanitize(&task.subject))?;
        writeln!(out, "priority  {}", sanitize(&task.priority))?;
        writeln!(out, "status    {}", sanitize(&task.status))?;

        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn short_id(task: &Task) -> String {
    task.id.to_string().chars().take(8).collect()
}

/// Task text is user-controlled; control characters (ESC included)
/// would otherwise pass straight through to the terminal. Each one
/// becomes a space before anything is emitted.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect()
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

    write!(writer, "  ")?;
    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    write!(writer, "  ")?;
    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        write!(writer, "  ")?;
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Our own color codes must not count toward column widths.
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

#[cfg(test)]
mod tests {
    use super::{sanitize, strip_ansi};

    #[test]
    fn sanitize_neutralizes_control_characters() {
        assert_eq!(sanitize("plain title"), "plain title");
        assert_eq!(sanitize("bad\x1b[31mtitle"), "bad [31mtitle");
        assert_eq!(sanitize("line\nbreak\ttab"), "line break tab");
    }

    #[test]
    fn strip_ansi_removes_color_codes_only() {
        assert_eq!(strip_ansi("\x1b[33mabcd1234\x1b[0m"), "abcd1234");
        assert_eq!(strip_ansi("no codes"), "no codes");
    }
}
