use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::{
    app::App,
    category::Category,
    classify::{Classification, Status},
};

const TITLE: &str = "Tilastoindikaattorit";
const EMPTY_STATE: &str = "Ei vielä rivejä. Lataa CSV tai lisää tietoja myöhemmin.";

/// Grid cells for the visible window: row `j` holds the `offset + j`-th
/// match of every category, blank where a column is shorter.
pub fn grid_rows(classification: &Classification, offset: usize, limit: usize) -> Vec<Vec<String>> {
    (offset..classification.depth())
        .take(limit)
        .map(|row| {
            classification
                .iter()
                .map(|(_, names)| names.get(row).cloned().unwrap_or_default())
                .collect()
        })
        .collect()
}

fn status_style(status: &Status) -> Style {
    match status {
        Status::Failed(_) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Status::Classified(_) => Style::default().fg(Color::Green),
        Status::NoMatches => Style::default().fg(Color::Yellow),
        Status::NoRows => Style::default().add_modifier(Modifier::DIM),
    }
}

fn render_grid(app: &App, f: &mut Frame, area: Rect) {
    let classification = app.dashboard.classification();
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Vihje- ja mallivastaustaulukko");

    if classification.is_empty() {
        let message = match app.status() {
            Status::NoMatches => "Yksikään rivi ei osunut mihinkään luokkaan.",
            _ => EMPTY_STATE,
        };
        let empty = Paragraph::new(message)
            .block(block)
            .style(Style::default().add_modifier(Modifier::ITALIC))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(
        Category::ALL
            .iter()
            .map(|category| {
                let count = classification.get(*category).len();
                Cell::from(format!("{category} ({count})"))
            })
            .collect::<Vec<_>>(),
    )
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .height(2);

    // borders + header
    let visible = area.height.saturating_sub(4) as usize;
    let rows = grid_rows(classification, app.scroll_offset, visible)
        .into_iter()
        .map(|cells| Row::new(cells.into_iter().map(Cell::from).collect::<Vec<_>>()));

    let widths = [Constraint::Ratio(1, Category::ALL.len() as u32); 8];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

/// Render the whole grid screen
pub fn render(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Status
            Constraint::Min(0),    // Grid
            Constraint::Length(2), // Instructions
        ])
        .split(f.area());

    let title = Paragraph::new(TITLE)
        .block(Block::default().borders(Borders::ALL))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let source = app
        .source
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "stdin".to_string());
    let status = Paragraph::new(Line::from(vec![
        Span::styled(app.status().to_string(), status_style(app.status())),
        Span::styled(format!("  [{source}]"), Style::default().add_modifier(Modifier::DIM)),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Tila"));
    f.render_widget(status, chunks[1]);

    render_grid(app, f, chunks[2]);

    let mut help = vec!["(r)eload", "↑/↓ scroll", "(q)uit"];
    if app.watch {
        help.insert(0, "watching");
    }
    let instructions = Paragraph::new(help.join("  ·  "))
        .style(Style::default().add_modifier(Modifier::DIM))
        .alignment(Alignment::Center);
    f.render_widget(instructions, chunks[3]);
}
