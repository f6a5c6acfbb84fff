//! The routed shell: header, navigation sidebar, content, footer.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::page::render_page;
use super::theme::{COLOR_ACCENT, COLOR_BORDER, COLOR_DIM, COLOR_HEADER};
use crate::app::App;

const SIDEBAR_WIDTH: u16 = 24;

pub fn render_shell(frame: &mut Frame, app: &App) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());
    let [sidebar, content] =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)]).areas(body);

    render_header(frame, header, app);
    render_sidebar(frame, sidebar, app);
    render_page(frame, content, app);
    render_footer(frame, footer, app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let user = app
        .gate
        .state()
        .user()
        .map(|u| u.display_name().to_string())
        .unwrap_or_default();

    let location = match &app.path_prompt {
        Some(prompt) => Span::styled(format!("Go to: {}█", prompt), Style::default().fg(COLOR_ACCENT)),
        None => Span::styled(app.nav.current().to_string(), Style::default().fg(COLOR_HEADER)),
    };
    let line = Line::from(vec![
        Span::styled(" cloudinv ", Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        location,
        Span::styled(format!("   {}", user), Style::default().fg(COLOR_DIM)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let active = app.routes.index_of(app.nav.current());
    let items: Vec<ListItem> = app
        .routes
        .routes()
        .iter()
        .enumerate()
        .map(|(i, route)| {
            let style = if Some(i) == active {
                Style::default().fg(COLOR_ACCENT)
            } else {
                Style::default().fg(COLOR_HEADER)
            };
            ListItem::new(Line::styled(route.label, style))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(COLOR_BORDER))
                .title(" Navigation "),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("› ");

    let mut state = ListState::default().with_selected(Some(app.sidebar_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let text = match &app.status {
        Some(status) => status.clone(),
        None if app.path_prompt.is_some() => "[Enter] Go  [Esc] Cancel".to_string(),
        None => "[↑/↓] Select  [Enter] Open  [/] Path  [Bksp] Back  [r] Reload  [o] Sign out  [q] Quit"
            .to_string(),
    };
    frame.render_widget(Paragraph::new(text).style(Style::default().fg(COLOR_DIM)), area);
}
