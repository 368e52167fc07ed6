//! Status view - held keys and their envelope levels

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Width of the volume meter in cells.
const METER_WIDTH: usize = 24;

const HELP: &str = " [z..m] [q..u] [i..]] [Bksp] [\\ Enter] play  [Esc] Quit";

/// One held key, ready for display.
pub struct HeldNoteRow {
    pub label: String,
    pub frequency: f64,
    pub volume: f32,
}

/// Everything the view draws in one frame.
pub struct StatusView {
    pub transpose: i32,
    pub tick_rate: u32,
    pub sample_rate: u32,
    pub channels: u16,
    pub notes: Vec<HeldNoteRow>,
}

/// Render the whole view
pub fn render(frame: &mut Frame, view: &StatusView) {
    let block = Block::default().title(" Piano ").borders(Borders::ALL);
    let inner = block.inner(frame.area());
    frame.render_widget(block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status line
            Constraint::Min(1),    // Held notes
            Constraint::Length(1), // Help bar
        ])
        .split(inner);

    let status = Line::from(vec![
        Span::styled(
            format!(" Transpose: {:+}  ", view.transpose),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{} Hz ticks  ", view.tick_rate),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:.1}kHz x{}", view.sample_rate as f32 / 1000.0, view.channels),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(status), chunks[0]);

    let rows: Vec<Line> = if view.notes.is_empty() {
        vec![Line::styled(
            " (no keys held)",
            Style::default().fg(Color::DarkGray),
        )]
    } else {
        view.notes.iter().map(note_line).collect()
    };
    frame.render_widget(Paragraph::new(rows), chunks[1]);

    let help = Paragraph::new(HELP)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}

fn note_line(note: &HeldNoteRow) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {:>5} ", note.label), Style::default().fg(Color::White)),
        Span::styled(
            format!("{:>8.2} Hz ", note.frequency),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(meter(note.volume), Style::default().fg(Color::LightGreen)),
        Span::raw(format!(" {:.2}", note.volume)),
    ])
}

/// Horizontal bar proportional to `volume`.
fn meter(volume: f32) -> String {
    let filled = (volume.clamp(0.0, 1.0) * METER_WIDTH as f32).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(METER_WIDTH - filled))
}
