//! Content area: the page component the current route selects.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};

use super::helpers::{column_widths, spinner, truncate_to_width};
use super::theme::{COLOR_ACCENT, COLOR_BORDER, COLOR_DIM, COLOR_ERROR};
use crate::app::App;
use crate::pages::{PageKind, PageState, ResourceTable};

/// Draw the matched page. An unmatched path leaves the area empty.
pub fn render_page(frame: &mut Frame, area: Rect, app: &App) {
    let Some(page) = app.current_page() else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER))
        .title(format!(" {} ", page.title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if page == PageKind::Home {
        render_home(frame, inner, app);
        return;
    }

    match app.current_page_state() {
        PageState::Idle | PageState::Loading => {
            let text = format!("{} Loading {}...", spinner(app.tick_count), page.title());
            frame.render_widget(Paragraph::new(text).style(Style::default().fg(COLOR_DIM)), inner);
        }
        PageState::Loaded(table) if table.is_empty() => {
            frame.render_widget(
                Paragraph::new("No resources found.").style(Style::default().fg(COLOR_DIM)),
                inner,
            );
        }
        PageState::Loaded(table) => render_table(frame, inner, table, app.page_scroll),
        PageState::Notice(text) => {
            frame.render_widget(Paragraph::new(text.as_str()).wrap(Wrap { trim: false }), inner);
        }
        PageState::Failed(message) => {
            let lines = vec![
                Line::styled(message.as_str(), Style::default().fg(COLOR_ERROR)),
                Line::default(),
                Line::styled("[r] Retry", Style::default().fg(COLOR_DIM)),
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
        }
    }
}

fn render_home(frame: &mut Frame, area: Rect, app: &App) {
    let name = app
        .gate
        .state()
        .user()
        .map(|user| user.display_name().to_string())
        .unwrap_or_default();
    let lines = vec![
        Line::styled(
            format!("Welcome, {}", name),
            Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD),
        ),
        Line::default(),
        Line::from("Pick a resource from the sidebar, or press / to type a path."),
        Line::from("Open Refresh to ask the backend to rebuild the inventory."),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_table(frame: &mut Frame, area: Rect, table: &ResourceTable, scroll: usize) {
    let widths = column_widths(&table.columns, &table.rows);
    let header = Row::new(
        table
            .columns
            .iter()
            .zip(&widths)
            .map(|(name, w)| Cell::from(truncate_to_width(name, *w))),
    )
    .style(Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD));

    let visible = (area.height as usize).saturating_sub(1);
    let start = scroll.min(table.len().saturating_sub(visible.max(1)));
    let rows = table.rows.iter().skip(start).take(visible).map(|row| {
        Row::new(
            row.iter()
                .zip(&widths)
                .map(|(cell, w)| Cell::from(truncate_to_width(cell, *w))),
        )
    });

    let constraints: Vec<Constraint> = widths.iter().map(|w| Constraint::Length(*w as u16)).collect();
    frame.render_widget(Table::new(rows, constraints).header(header).column_spacing(2), area);
}
