use crate::app::{App, Focus};
use maze_carver::render::tag_label;
use maze_carver::settings::Rgb;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 40;

/// Number of lines in controls content
pub const CONTROLS_CONTENT_LINES: u16 = 12;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

fn rgb((r, g, b): Rgb) -> Color {
    Color::Rgb(r, g, b)
}

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_maze(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_maze(frame, layout[1], app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

/// Visible lines of the controls box for a terminal height
pub fn get_controls_visible_lines(term_height: u16) -> u16 {
    // status + params boxes above, two border lines
    term_height.saturating_sub(8 + 10 + 2)
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),  // Status
            Constraint::Length(10), // Parameters
            Constraint::Min(6),     // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2], app);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Maze Carver ");
    let text = Style::default().fg(TEXT_COLOR);
    let dim = Style::default().fg(DIM_TEXT_COLOR);

    let mut content = vec![Line::from(Span::styled(app.request.path(), text))];
    match &app.outcome {
        Ok(stats) => {
            content.push(Line::from(Span::styled("SOLVED", Style::default().fg(Color::Green))));
            content.push(Line::from(Span::styled(
                format!("{}: {} fwd / {} rev", stats.phase.name(), stats.forward_iterations, stats.reverse_iterations),
                dim,
            )));
            content.push(Line::from(Span::styled(
                format!("teleports {} backtracks {}", stats.teleports, stats.backtracks),
                dim,
            )));
            content.push(Line::from(Span::styled(format!("open cells {}", stats.passable), dim)));
        }
        Err(err) => {
            content.push(Line::from(Span::styled("UNSOLVED", Style::default().fg(Color::Red))));
            content.push(Line::from(Span::styled(err.to_string(), dim)));
        }
    }
    if let Some(msg) = &app.message {
        content.push(Line::from(Span::styled(msg.clone(), Style::default().fg(HIGHLIGHT_COLOR))));
    }

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Parameters ");

    let make_line = |label: &str, value: String, focused: bool| {
        let prefix = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(HIGHLIGHT_COLOR)
        } else {
            Style::default().fg(TEXT_COLOR)
        };
        Line::from(Span::styled(format!("{}{}: {}", prefix, label, value), style))
    };

    let content = vec![
        make_line("Budget", format!("{}x", app.carve.forward_factor), app.focus == Focus::Budget),
        make_line("Palette", app.render.palette.name().to_string(), app.focus == Focus::Palette),
        make_line("Reverse", format!("{}x", app.carve.reverse_factor), app.focus == Focus::Reverse),
        make_line("Scale", format!("{}", app.render.scale), app.focus == Focus::Scale),
        make_line("Seed", format!("{}", app.request.seed), app.focus == Focus::Seed),
        make_line(
            "Size",
            format!("{}x{}", app.request.width, app.request.height),
            app.focus == Focus::Size,
        ),
        make_line(
            "Tags",
            if app.render.show_tags { "on" } else { "off" }.to_string(),
            app.focus == Focus::Tags,
        ),
    ];

    // Keep the focused line visible
    let focus_line = app.focus.line_index();
    let visible_height = area.height.saturating_sub(2);
    let content_height = content.len() as u16;

    let scroll = if visible_height == 0 || visible_height >= content_height {
        0
    } else if focus_line >= visible_height {
        focus_line.saturating_sub(visible_height - 1)
    } else {
        0
    };

    let paragraph = Paragraph::new(content).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    let make_control = |key: &str, desc: String| -> Line<'_> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("R", "random seed".to_string()),
        make_control("N/P", "next/prev seed".to_string()),
        make_control("+/-", "grow/shrink".to_string()),
        make_control("T", format!("tags: {}", if app.render.show_tags { "on" } else { "off" })),
        make_control("C", format!("palette: {}", app.render.palette.name())),
        make_control("S", "save SVG".to_string()),
        make_control("V", "fullscreen".to_string()),
        make_control("Tab", "select param".to_string()),
        make_control("↑/↓", "adjust param".to_string()),
        make_control("H", "help".to_string()),
        make_control("Esc", "leave param".to_string()),
        make_control("Q", "quit".to_string()),
    ];

    let content_height = content.len() as u16;
    let visible_height = area.height.saturating_sub(2);
    let max_scroll = content_height.saturating_sub(visible_height);

    let title = if max_scroll > 0 { " Controls (↑↓) " } else { " Controls " };

    let paragraph = Paragraph::new(content)
        .block(styled_block(title))
        .scroll((app.controls_scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Lines for the maze: two terminal columns per cell, with a wall border
fn maze_lines(app: &App) -> Vec<Line<'static>> {
    let grid = app.maze.read();
    let palette = app.render.palette;
    let wall = Style::default().bg(rgb(palette.wall()));
    let width = grid.dims().width.max(0) as usize;
    let border = || Line::from(Span::styled("  ".repeat(width + 2), wall));

    let mut lines = Vec::with_capacity(grid.dims().height.max(0) as usize + 2);
    lines.push(border());
    for row in grid.rows() {
        let mut spans = Vec::with_capacity(width + 2);
        spans.push(Span::styled("  ", wall));
        for loc in row {
            if !loc.passable {
                spans.push(Span::styled("  ", wall));
                continue;
            }
            let label = if app.render.show_tags { tag_label(loc) } else { None };
            let style = Style::default().bg(rgb(palette.open()));
            match label {
                Some(ch) => spans.push(Span::styled(
                    format!("{ch} "),
                    style.fg(rgb(palette.tag(loc.special))),
                )),
                None => spans.push(Span::styled("  ", style)),
            }
        }
        spans.push(Span::styled("  ", wall));
        lines.push(Line::from(spans));
    }
    lines.push(border());
    lines
}

fn render_maze(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(" {} ", app.maze.dims());
    let block = styled_block(&title);
    let paragraph = Paragraph::new(maze_lines(app)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    let canvas_x = if app.fullscreen_mode { 0 } else { SIDEBAR_WIDTH };
    let canvas_width = if app.fullscreen_mode {
        area.width
    } else {
        area.width.saturating_sub(SIDEBAR_WIDTH)
    };

    // Center the help dialog within the canvas
    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(30);
    let x = canvas_x + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    frame.render_widget(Clear, help_area);

    let heading = Style::default().fg(HIGHLIGHT_COLOR);
    let label = Style::default().fg(TEXT_COLOR);
    let content = vec![
        Line::from(""),
        Line::from(Span::styled("RANDOM-WALK MAZE CARVER", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("A walk from the top-left corner opens one cell at a time, never touching a second passage. If it runs out of budget before reaching the bottom-right corner, a second walk starts from the finish and joins the first."),
        Line::from(""),
        Line::from(Span::styled("TAGS:", heading)),
        Line::from(vec![Span::styled("S/F ", label), Span::raw("start and finish")]),
        Line::from(vec![Span::styled("*   ", label), Span::raw("where the forward budget ran out")]),
        Line::from(vec![Span::styled("r   ", label), Span::raw("cells carved walking back from the finish")]),
        Line::from(vec![Span::styled("e   ", label), Span::raw("forward dead ends")]),
        Line::from(""),
        Line::from(Span::styled("PARAMETERS:", heading)),
        Line::from("Budget and Reverse are iterations per cell for each walk. Lower budgets leave more of the maze to the reverse walk."),
        Line::from(""),
        Line::from(Span::styled("BASIC CONTROLS:", heading)),
        Line::from("R=Random seed, N/P=Next/Prev seed, +/-=Size, T=Tags, C=Palette, S=Save SVG, V=Fullscreen, Tab/Arrows=Adjust, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2);
    let max_scroll = content_height.saturating_sub(visible_height);

    let title = if max_scroll > 0 {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_carver::config::AppConfig;
    use maze_carver::request::MazeRequest;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app() -> App {
        let req = MazeRequest {
            width: 5,
            height: 4,
            seed: 3,
            ..Default::default()
        };
        App::new(req, &AppConfig::default())
    }

    #[test]
    fn test_maze_lines_shape() {
        let app = app();
        let lines = maze_lines(&app);
        assert_eq!(lines.len(), 6);
        assert!(lines.iter().all(|l| l.width() == 14));
    }

    #[test]
    fn test_render_does_not_panic() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        app.toggle_help();
        app.toggle_fullscreen();
        terminal.draw(|f| render(f, &app)).unwrap();
    }
}
