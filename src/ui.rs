use crate::{
    console::{Notice, Tone},
    dashboard::{View, ViewState},
    theme,
};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};

const KEY_LEGEND: &str =
    " ↑/↓ select   Enter start/stop   c clone   d delete   r refresh   q quit";

pub fn draw_dashboard(frame: &mut Frame, view: &View) {
    match &view.state {
        ViewState::Loading => draw_message(
            frame,
            vec![Line::styled("Querying the hypervisor...", theme::muted())],
        ),
        ViewState::Unavailable(reason) => draw_message(
            frame,
            vec![
                Line::styled(reason.message(), theme::tone_style(Tone::Error)),
                Line::from(""),
                Line::from(reason.hint()),
                Line::from(""),
                Line::styled("Press q to quit.", theme::muted()),
            ],
        ),
        _ => draw_inventory(frame, view),
    }
}

fn draw_inventory(frame: &mut Frame, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(4),    // Table
            Constraint::Length(1), // Legend
            Constraint::Length(1), // Status
        ])
        .split(frame.area());

    let title = Line::from(vec![
        Span::styled(" virtdeck ", theme::title()),
        Span::styled("│", theme::border()),
        Span::raw(format!(" {} machines ", view.snapshot.len())),
        Span::styled("│", theme::border()),
        Span::styled(
            format!(" refreshed {}", view.snapshot.taken_at.format("%H:%M:%S")),
            theme::muted(),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(title).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::border()),
        ),
        chunks[0],
    );

    let table_block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_focus())
        .title(" Virtual machines ");

    if view.snapshot.is_empty() {
        frame.render_widget(
            Paragraph::new("No virtual machines are defined. Press r to refresh or q to quit.")
                .style(theme::muted())
                .wrap(Wrap { trim: true })
                .block(table_block),
            chunks[1],
        );
    } else {
        let header = Row::new(["ID", "NAME", "STATE", "IP", "ACTION", "MORE"])
            .style(theme::column_header())
            .bottom_margin(1);

        let rows = view.snapshot.records.iter().map(|record| {
            Row::new(vec![
                Cell::from(record.ordinal.to_string()),
                Cell::from(record.name.clone()),
                Cell::from(record.state.label()).style(theme::state_style(record.state)),
                Cell::from(record.address.to_string()),
                Cell::from(record.primary_action.label()),
                Cell::from(record.secondary_label()).style(theme::muted()),
            ])
        });

        let widths = [
            Constraint::Length(3),
            Constraint::Min(16),
            Constraint::Length(10),
            Constraint::Length(15),
            Constraint::Length(7),
            Constraint::Length(15),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(table_block)
            .row_highlight_style(theme::selection())
            .highlight_symbol("▶ ");

        let mut state = TableState::default().with_selected(Some(view.selected));
        frame.render_stateful_widget(table, chunks[1], &mut state);
    }

    frame.render_widget(Paragraph::new(KEY_LEGEND).style(theme::muted()), chunks[2]);

    if let Some(status) = &view.status {
        frame.render_widget(
            Paragraph::new(format!(" {}", status)).style(theme::tone_style(Tone::Info)),
            chunks[3],
        );
    }
}

fn draw_message(frame: &mut Frame, lines: Vec<Line>) {
    let area = centered_rect(70, 9, frame.area());
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme::border_focus())
                    .title(" virtdeck "),
            ),
        area,
    );
}

pub fn draw_prompt(frame: &mut Frame, label: &str, input: &str) {
    let area = centered_rect(60, 7, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(label.to_string()),
        Line::from(vec![
            Span::styled(input.to_string(), theme::title()),
            Span::styled("_", theme::muted()),
        ]),
        Line::from(""),
        Line::styled("Enter to confirm, Esc to cancel", theme::muted()),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::border_focus())
                .title(" Clone "),
        ),
        area,
    );
}

pub fn draw_notice(frame: &mut Frame, notice: &Notice, waiting: bool) {
    let area = centered_rect(70, 9, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::styled(notice.title.clone(), theme::tone_style(notice.tone))];
    if let Some(detail) = &notice.detail {
        lines.push(Line::from(""));
        lines.extend(detail.lines().map(|line| Line::from(line.to_string())));
    }
    if waiting {
        lines.push(Line::from(""));
        lines.push(Line::styled("Press any key to continue.", theme::muted()));
    }

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::tone_style(notice.tone)),
        ),
        area,
    );
}

/// A rectangle `percent_x` wide and `height` rows tall, centred in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
