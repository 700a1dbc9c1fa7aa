use crate::state::{App, FilePreview, FocusMode};
use crate::theme::{self, icons};
use pulse_core::{artifact_percent, plans_percent, CounterId, Sender, TimelineStep};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

const TREND_LABELS: [&str; 4] = ["T1", "T2", "T3", "T4"];

pub fn render(f: &mut Frame, app: &App) {
    let area = f.size();

    if app.show_assistant || app.show_help {
        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);

        render_dashboard(f, app, main[0]);
        if app.show_assistant {
            render_assistant(f, app, main[1]);
        } else {
            render_help(f, main[1]);
        }
    } else {
        render_dashboard(f, app, area);
    }
}

fn render_dashboard(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 20 || area.height < 12 {
        // Too small to lay the panels out; degrade to the status line.
        render_header(f, app, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Length(9),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, rows[0]);
    render_timeline(f, app, rows[1]);
    render_stats(f, app, rows[2]);
    render_charts(f, app, rows[3]);
    render_overview(f, app, rows[4]);
    render_footer(f, rows[5]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" plan-pulse ", theme::HEADER_STYLE));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut spans = vec![Span::styled(app.status.clone(), theme::STATUS_STYLE)];
    if let Some(error) = &app.last_error {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(error.clone(), theme::ERROR_STYLE));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn render_timeline(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Timeline");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut spans = Vec::new();
    for (idx, step) in TimelineStep::ALL.iter().enumerate() {
        let lit = app.step.marker_emphasized(idx as u8);
        let marker = if lit { icons::STEP_ON } else { icons::STEP_OFF };
        spans.push(Span::styled(
            format!(" {} {}.{} ", marker, step.index(), step.label()),
            theme::step_marker_style(lit),
        ));
        if idx + 1 < TimelineStep::ALL.len() {
            spans.push(Span::styled("--", theme::DIM_STYLE));
        }
    }
    f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn render_stats(f: &mut Frame, app: &App, area: Rect) {
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    let syllabi = app.counters.value(CounterId::StatSyllabi);
    let tests = app.counters.value(CounterId::StatTests);
    let plans = app.counters.value(CounterId::StatPlans);

    render_stat_tile(
        f,
        tiles[0],
        "Syllabi",
        syllabi,
        artifact_percent(app.snapshot.syllabi),
    );
    render_stat_tile(
        f,
        tiles[1],
        "Tests",
        tests,
        artifact_percent(app.snapshot.tests),
    );
    render_stat_tile(
        f,
        tiles[2],
        "Plans",
        plans,
        plans_percent(app.snapshot.plans_generated),
    );
}

fn render_stat_tile(f: &mut Frame, area: Rect, title: &str, value: i64, percent: u16) {
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height < 2 {
        return;
    }

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    f.render_widget(
        Paragraph::new(Span::styled(
            value.to_string(),
            Style::new().add_modifier(Modifier::BOLD),
        )),
        parts[0],
    );
    let gauge = Gauge::default()
        .gauge_style(Style::new().fg(Color::Rgb(129, 140, 248)))
        .percent(percent.min(100))
        .label(format!("{percent}%"));
    f.render_widget(gauge, parts[1]);
}

fn render_charts(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(40),
            Constraint::Percentage(26),
        ])
        .split(area);

    let Some(charts) = &app.charts else {
        let block = Block::default().borders(Borders::ALL).title("Charts");
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(
            Paragraph::new(Span::styled("Waiting for first sync", theme::DIM_STYLE)),
            inner,
        );
        return;
    };

    // Proportion chart: uploaded vs. still missing against the baseline.
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Syllabus coverage");
    let inner = block.inner(columns[0]);
    f.render_widget(block, columns[0]);
    if inner.height >= 1 {
        let data = charts.proportion.data();
        let uploaded = data.first().copied().unwrap_or(0);
        let total = data.iter().sum::<u64>().max(1);
        let pct = ((uploaded * 100) / total).min(100) as u16;
        let gauge = Gauge::default()
            .gauge_style(Style::new().fg(Color::Rgb(99, 102, 241)))
            .percent(pct)
            .label(format!("{uploaded} of {total}"));
        f.render_widget(gauge, inner);
    }

    // Trend chart: the synthetic four-point series.
    let block = Block::default().borders(Borders::ALL).title("Test trend");
    let inner = block.inner(columns[1]);
    f.render_widget(block, columns[1]);
    if inner.width >= 16 && inner.height >= 3 {
        let bars: Vec<(&str, u64)> = TREND_LABELS
            .iter()
            .zip(charts.trend.data())
            .map(|(label, value)| (*label, *value))
            .collect();
        let chart = BarChart::default()
            .data(&bars)
            .bar_width(3)
            .bar_gap(1)
            .bar_style(Style::new().fg(Color::Rgb(6, 182, 212)))
            .value_style(Style::new().fg(Color::Black).bg(Color::Rgb(6, 182, 212)));
        f.render_widget(chart, inner);
    }

    render_totals(f, app, columns[2]);
}

fn render_totals(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Totals");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = [
        ("Syllabi", app.counters.value(CounterId::ListSyllabi)),
        ("Tests", app.counters.value(CounterId::ListTests)),
        ("Plans", app.counters.value(CounterId::ListPlans)),
    ];
    let lines: Vec<Line> = rows
        .iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label:<8}"), theme::DIM_STYLE),
                Span::styled(value.to_string(), Style::new().add_modifier(Modifier::BOLD)),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn render_overview(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(area);

    render_plan(f, app, columns[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(4)])
        .split(columns[1]);
    render_highlights(f, app, side[0]);
    render_previews(f, app, side[1]);
}

fn render_plan(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Plan overview");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.plan_skeleton {
        let width = inner.width.saturating_sub(2).max(4) as usize;
        let lines = vec![
            Line::from(Span::styled("▒".repeat(width / 3), theme::DIM_STYLE)),
            Line::from(""),
            Line::from(Span::styled("▒".repeat(width), theme::DIM_STYLE)),
            Line::from(Span::styled("▒".repeat(width), theme::DIM_STYLE)),
            Line::from(Span::styled("▒".repeat(width * 3 / 4), theme::DIM_STYLE)),
        ];
        f.render_widget(Paragraph::new(lines), inner);
        return;
    }

    if app.plan_text.trim().is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "No plan yet. The generator writes it here.",
                theme::DIM_STYLE,
            )),
            inner,
        );
        return;
    }

    let text: Vec<Line> = app.plan_text.lines().map(Line::from).collect();
    f.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
}

fn render_highlights(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("AI tags & weak areas");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.highlights.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("No plan analyzed yet", theme::DIM_STYLE)),
            inner,
        );
        return;
    }

    let mut constraints = vec![Constraint::Length(2)];
    constraints.extend(app.highlights.iter().map(|_| Constraint::Length(1)));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let tags: Vec<Span> = app
        .highlights
        .iter()
        .flat_map(|entry| {
            [
                Span::styled(format!("[{}]", entry.term), theme::tag_badge_style(entry.is_hot())),
                Span::raw(" "),
            ]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(tags)).wrap(Wrap { trim: true }), rows[0]);

    for (idx, entry) in app.highlights.iter().enumerate() {
        let row = rows[idx + 1];
        if row.height < 1 || row.width < 16 {
            continue;
        }
        let gauge = Gauge::default()
            .gauge_style(Style::new().fg(theme::heat_color(entry.score)))
            .percent(entry.percent().min(100))
            .label(format!("{:<9} {:>3}%", entry.term, entry.percent()));
        f.render_widget(gauge, row);
    }
}

fn render_previews(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Recent uploads");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.previews.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("Nothing uploaded yet", theme::DIM_STYLE)),
            inner,
        );
        return;
    }

    let items: Vec<ListItem> = app
        .previews
        .iter()
        .enumerate()
        .map(|(idx, preview)| {
            ListItem::new(Line::from(preview_spans(preview))).style(theme::zebra_row_style(idx))
        })
        .collect();
    f.render_widget(List::new(items), inner);
}

fn preview_spans(preview: &FilePreview) -> Vec<Span<'_>> {
    vec![
        Span::raw(preview.name.clone()),
        Span::styled(
            format!(
                "  {:.1} KB | {} | {}",
                preview.size_kb,
                preview.kind,
                preview.added.format("%H:%M:%S")
            ),
            theme::DIM_STYLE,
        ),
    ]
}

fn render_assistant(f: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.focus == FocusMode::Assistant {
        Style::new().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Assistant (local)")
        .border_style(border_style);
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height < 2 {
        return;
    }

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let lines: Vec<Line> = app
        .chat
        .bubbles()
        .iter()
        .map(|bubble| {
            let (icon, style) = match bubble.sender {
                Sender::User => (icons::USER, theme::bubble_style(true)),
                Sender::Assistant => (icons::ASSISTANT, theme::bubble_style(false)),
            };
            Line::from(vec![
                Span::styled(format!("{icon} "), style),
                Span::raw(bubble.text.clone()),
            ])
        })
        .collect();

    let total_height = wrapped_height(&lines, parts[0].width);
    let scroll = total_height.saturating_sub(parts[0].height);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .scroll((scroll, 0)),
        parts[0],
    );

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("> ", theme::STATUS_STYLE),
            Span::raw(app.chat_input.clone()),
            Span::styled("_", theme::DIM_STYLE),
        ])),
        parts[1],
    );
}

fn render_help(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Help")
        .border_style(Style::new().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::new().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("g", Color::Cyan),
            Span::raw("        Mark analysis started (skeleton)"),
        ]),
        Line::from(vec![
            Span::styled("e", Color::Cyan),
            Span::raw("        Prepare export"),
        ]),
        Line::from(vec![
            Span::styled("a", Color::Cyan),
            Span::raw("        Open assistant"),
        ]),
        Line::from(vec![
            Span::styled("r", Color::Cyan),
            Span::raw("        Force refresh"),
        ]),
        Line::from(vec![
            Span::styled("Esc", Color::Cyan),
            Span::raw("      Close panel"),
        ]),
        Line::from(vec![
            Span::styled("?", Color::Cyan),
            Span::raw("        Toggle help"),
        ]),
        Line::from(vec![
            Span::styled("q", Color::Cyan),
            Span::raw("        Quit"),
        ]),
    ];
    f.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);
}

fn render_footer(f: &mut Frame, area: Rect) {
    f.render_widget(
        Paragraph::new(Span::styled(
            " q quit | g generate | e export | a assistant | r refresh | ? help",
            theme::DIM_STYLE,
        )),
        area,
    );
}

fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    let width = width.max(1) as usize;
    let mut total: usize = 0;
    for line in lines {
        let line_width = line.width();
        if line_width == 0 {
            total += 1;
        } else {
            total += (line_width + width - 1) / width;
        }
    }
    total as u16
}
