use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, Column, Focus, Mode, ShotRow, ShotTable};
use crate::tui::theme::Theme;
use crate::util::unicode::{display_width, next_grapheme_boundary, truncate_to_width};

/// Narrowest width of each column, in the order of [`Column::ALL`]
const MIN_WIDTHS: [u16; 10] = [2, 9, 11, 10, 8, 9, 11, 7, 8, 4];

const ACTION: usize = 8;

/// Columns that fit in `width`, as (column index, x offset, width).
///
/// `#` is always first. The rest start at `first`, moved just enough to keep
/// `cursor` visible. Returns the adjusted `first` and the visible columns;
/// spare width goes to Action, or to the last visible column when Action is
/// scrolled out.
fn column_layout(width: u16, first: usize, cursor: usize) -> (usize, Vec<(usize, u16, u16)>) {
    let last = MIN_WIDTHS.len() - 1;
    let cursor = cursor.clamp(1, last);
    let span = |from: usize, to: usize| -> u16 {
        MIN_WIDTHS[0] + MIN_WIDTHS[from..=to].iter().map(|w| w + 1).sum::<u16>()
    };
    let mut first = first.clamp(1, cursor);
    while first < cursor && span(first, cursor) > width {
        first += 1;
    }
    while first > 1 && span(first - 1, last) <= width {
        first -= 1;
    }

    let mut visible = vec![0];
    let mut used = MIN_WIDTHS[0];
    for ci in first..=last {
        let w = MIN_WIDTHS[ci] + 1;
        if ci > first && used + w > width {
            break;
        }
        visible.push(ci);
        used += w;
    }
    let spare = width.saturating_sub(used);
    let grow = if visible.contains(&ACTION) {
        ACTION
    } else {
        visible.last().copied().unwrap_or(0)
    };

    let mut columns = Vec::with_capacity(visible.len());
    let mut x = 0u16;
    for ci in visible {
        let mut w = MIN_WIDTHS[ci];
        if ci == grow {
            w += spare;
        }
        let w = w.min(width.saturating_sub(x));
        if w == 0 {
            break;
        }
        columns.push((ci, x, w));
        x = x.saturating_add(w + 1);
    }
    (first, columns)
}

/// Render the shot table of the open component and record cell rectangles
pub fn render_shot_table(frame: &mut Frame, app: &mut App, area: Rect) {
    app.layout.table = area;
    app.layout.cells.clear();
    app.layout.visible_rows = 0;

    let theme = &app.theme;
    let bg = theme.background;
    let focused = app.focus == Focus::Table;
    let border = if focused && app.mode == Mode::Navigate {
        theme.accent
    } else {
        theme.dim
    };
    let title = match &app.table {
        Some(table) => format!(" {} ", table.component.label()),
        None => " Shots ".to_string(),
    };
    let title = truncate_to_width(&title, area.width.saturating_sub(2) as usize);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, Style::default().fg(theme.text_bright)))
        .border_style(Style::default().fg(border).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let dim = Style::default().fg(theme.dim).bg(bg);
    let Some(table) = app.table.as_mut() else {
        frame.render_widget(
            Paragraph::new(" Select a script component to plan its shots").style(dim),
            inner,
        );
        return;
    };
    if inner.height == 0 {
        return;
    }

    let (first, layout) = column_layout(inner.width, table.col_scroll, table.col);
    table.col_scroll = first;
    let table = &*table;
    let columns: Vec<(usize, Rect)> = layout
        .into_iter()
        .map(|(ci, x, width)| {
            let rect = Rect {
                x: inner.x + x,
                y: inner.y,
                width,
                height: 1,
            };
            (ci, rect)
        })
        .collect();
    let header_style = dim.add_modifier(Modifier::BOLD);
    for &(ci, rect) in &columns {
        frame.render_widget(
            Paragraph::new(truncate_to_width(Column::ALL[ci].title(), rect.width as usize))
                .style(header_style),
            rect,
        );
    }

    let body_h = inner.height.saturating_sub(1) as usize;
    if table.rows.is_empty() {
        let area = Rect {
            y: inner.y + 1,
            height: inner.height.saturating_sub(1),
            ..inner
        };
        frame.render_widget(
            Paragraph::new(" No shots yet. Press a to add one.").style(dim),
            area,
        );
    }

    let editing = app.mode == Mode::Edit;
    let mut cells = Vec::new();
    for (offset, (ri, row)) in table
        .rows
        .iter()
        .enumerate()
        .skip(table.scroll)
        .take(body_h)
        .enumerate()
    {
        let y = inner.y + 1 + offset as u16;
        let is_cursor_row = focused && ri == table.row;
        let row_bg = if is_cursor_row { theme.selection_bg } else { bg };
        for &(ci, column_rect) in &columns {
            let column = Column::ALL[ci];
            let rect = Rect { y, ..column_rect };
            cells.push((ri, ci, rect));
            let is_cursor = is_cursor_row && ci == table.col;
            let cell = CellContext {
                theme,
                bg: row_bg,
                cursor: is_cursor,
                editing: is_cursor && editing,
                width: rect.width as usize,
            };
            let line = cell.line(table, row, column);
            frame.render_widget(Paragraph::new(line).style(Style::default().bg(row_bg)), rect);
        }
    }

    app.layout.cells = cells;
    app.layout.visible_rows = body_h;
}

struct CellContext<'t> {
    theme: &'t Theme,
    bg: ratatui::style::Color,
    cursor: bool,
    editing: bool,
    width: usize,
}

impl CellContext<'_> {
    fn style(&self) -> Style {
        let style = Style::default().fg(self.theme.text).bg(self.bg);
        if self.cursor {
            style.fg(self.theme.accent).add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    fn dim(&self) -> Style {
        Style::default().fg(self.theme.dim).bg(self.bg)
    }

    fn plain(&self, text: &str, style: Style) -> Line<'static> {
        Line::from(Span::styled(truncate_to_width(text, self.width), style))
    }

    fn line(&self, table: &ShotTable, row: &ShotRow, column: Column) -> Line<'static> {
        match column {
            Column::Number => self.plain(&format!("{:>2}", row.shot.shot_number), self.dim()),
            Column::Field(f) => {
                let field = row.field(f);
                if field.is_loading() {
                    self.plain("Loading\u{2026}", self.dim().add_modifier(Modifier::ITALIC))
                } else if self.editing && field.is_focused() {
                    if field.text().is_empty() {
                        self.placeholder(&field.props().placeholder)
                    } else {
                        self.edit(field.text(), field.cursor(), self.style())
                    }
                } else {
                    self.plain(field.text(), self.style())
                }
            }
            Column::Other(f) => {
                let field = row.field(f);
                if !field.shows_custom_slot() {
                    return Line::default();
                }
                let style = if self.cursor {
                    self.style()
                } else {
                    Style::default().fg(self.theme.custom).bg(self.bg)
                };
                let text = field.other_text();
                if self.editing {
                    self.edit(text, text.len(), style)
                } else {
                    self.plain(text, style)
                }
            }
            Column::Text(t) => {
                let text = table.text(row, t);
                if self.editing {
                    self.edit(&text, text.len(), self.style())
                } else {
                    self.plain(&text, self.style())
                }
            }
            Column::Done => {
                if row.shot.completed {
                    self.plain("[x]", Style::default().fg(self.theme.success).bg(self.bg))
                } else {
                    self.plain("[ ]", if self.cursor { self.style() } else { self.dim() })
                }
            }
        }
    }

    fn cursor_style(&self) -> Style {
        Style::default().fg(self.theme.background).bg(self.theme.accent)
    }

    fn placeholder(&self, placeholder: &str) -> Line<'static> {
        Line::from(vec![
            Span::styled(" ", self.cursor_style()),
            Span::styled(
                truncate_to_width(placeholder, self.width.saturating_sub(1)),
                self.dim(),
            ),
        ])
    }

    /// Text with a block cursor at byte offset `cursor`, scrolled so the cursor shows.
    fn edit(&self, text: &str, cursor: usize, style: Style) -> Line<'static> {
        let cursor = cursor.min(text.len());
        let (mut before, rest) = text.split_at(cursor);
        let split = next_grapheme_boundary(rest, 0).unwrap_or(0);
        let (at, after) = rest.split_at(split);
        let at = if at.is_empty() { " " } else { at };
        while !before.is_empty() && display_width(before) + display_width(at) > self.width {
            let next = next_grapheme_boundary(before, 0).unwrap_or(before.len());
            before = &before[next..];
        }
        Line::from(vec![
            Span::styled(before.to_string(), style),
            Span::styled(at.to_string(), self.cursor_style()),
            Span::styled(after.to_string(), style),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShotField;
    use crate::tui::render::test_helpers::{render_to_string, sample_app, sample_app_loading};
    use pretty_assertions::assert_eq;

    fn render(app: &mut App) -> String {
        render_to_string(120, 8, |frame, area| render_shot_table(frame, app, area))
    }

    #[test]
    fn rows_show_values_and_custom_text() {
        let mut app = sample_app();
        let out = render(&mut app);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("C1 Every great meal starts in a kitchen that works."));
        assert!(lines[1].contains("Shot Type"));
        assert!(lines[1].contains("Loc. Other"));
        assert!(lines[2].contains(" 1"));
        assert!(lines[2].contains("WS"));
        assert!(lines[2].contains("Kitchen"));
        assert!(lines[2].contains("Walks to the island"));
        assert!(lines[2].contains("[ ]"));
        assert!(lines[3].contains("Other"));
        assert!(lines[3].contains("Garden wi\u{2026}"));
        assert!(lines[3].contains("Hands"));
    }

    #[test]
    fn loading_fields_show_indicator() {
        let mut app = sample_app_loading();
        let out = render(&mut app);
        assert_eq!(out.lines().nth(2).unwrap().matches("Loading\u{2026}").count(), 4);
    }

    #[test]
    fn records_cell_rects() {
        let mut app = sample_app();
        render(&mut app);
        assert_eq!(app.layout.cells.len(), 2 * Column::ALL.len());
        assert_eq!(app.layout.visible_rows, 5);
        let (row, col, rect) = app.layout.cells[1];
        assert_eq!((row, col), (0, 1));
        assert_eq!(rect.y, 2);
        assert_eq!(rect.width, 9);
    }

    #[test]
    fn focused_empty_field_shows_placeholder() {
        let mut app = sample_app();
        app.focus = Focus::Table;
        app.mode = Mode::Edit;
        {
            let table = app.table.as_mut().unwrap();
            table.col = 1;
            let field = table.rows[0].field_mut(ShotField::ShotType);
            field.focus();
            field.set_text("");
        }
        let out = render(&mut app);
        assert!(out.lines().nth(2).unwrap().contains("Type to\u{2026}"));
    }

    #[test]
    fn every_column_is_reachable_at_80_columns() {
        let mut app = sample_app();
        app.focus = Focus::Table;
        for col in 1..Column::ALL.len() {
            app.table.as_mut().unwrap().col = col;
            render_to_string(80, 24, |frame, _| crate::tui::render::render(frame, &mut app));
            let rect = app.layout.cell_rect(0, col).unwrap();
            assert!(rect.width > 0, "{:?} has no width", Column::ALL[col]);
            let (_, hit, _) = app.layout.cell_at(rect.x, rect.y).unwrap();
            assert_eq!(hit, col);
            assert!(app.layout.cells.iter().all(|(_, _, r)| r.width > 0));
            assert!(app.layout.cell_rect(0, 0).is_some());
        }
    }

    #[test]
    fn narrow_table_scrolls_columns_to_the_cursor() {
        let (first, columns) = column_layout(40, 1, 8);
        assert!(first > 1);
        let ids: Vec<usize> = columns.iter().map(|(ci, _, _)| *ci).collect();
        assert_eq!(ids[0], 0);
        assert!(ids.contains(&8));
        let (_, x, w) = *columns.last().unwrap();
        assert!(x + w <= 40);

        // moving back left scrolls back
        let (first, _) = column_layout(40, first, 2);
        assert_eq!(first, 2);
    }

    #[test]
    fn wide_table_shows_every_column() {
        let (first, columns) = column_layout(88, 5, 9);
        assert_eq!(first, 1);
        assert_eq!(columns.len(), Column::ALL.len());
        let action = columns.iter().find(|(ci, _, _)| *ci == ACTION).unwrap();
        assert_eq!(action.2, MIN_WIDTHS[ACTION]);
    }

    #[test]
    fn no_component_placeholder() {
        let mut app = sample_app();
        app.close_table();
        let out = render(&mut app);
        assert!(out.contains("Select a script component to plan its shots"));
        assert!(app.layout.cells.is_empty());
    }

    #[test]
    fn empty_component_hint() {
        let mut app = sample_app();
        app.open_component("comp-3").unwrap();
        let out = render(&mut app);
        assert!(out.contains("No shots yet. Press a to add one."));
    }

    #[test]
    fn long_edit_text_keeps_cursor_visible() {
        let theme = Theme::default();
        let cell = CellContext {
            theme: &theme,
            bg: theme.background,
            cursor: true,
            editing: true,
            width: 5,
        };
        let line = cell.edit("abcdefgh", 8, Style::default());
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "efgh ");
    }
}
