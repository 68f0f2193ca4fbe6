//! TUI rendering for the NEON_CORE boot screen using ratatui.

mod input;
mod logo;
mod theme;

pub use input::{InputPump, handle_events, handle_key};
pub use logo::{LOGO, MAIN_CONTENT, logo_width};
pub use theme::{Glyphs, Palette, UiOptions, cursor_visible, glyphs, palette, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use neon_engine::{PageSnapshot, SurfaceId, SurfaceState};

/// Per-frame presentation state owned by the host loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewState {
    pub options: UiOptions,
    /// Frame counter, drives cursor blinking.
    pub tick: usize,
}

/// Main draw function
pub fn draw(frame: &mut Frame, snapshot: &PageSnapshot, view: &ViewState) {
    let palette = palette(view.options);
    let glyphs = glyphs(view.options);

    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let area = frame.area().inner(Margin::new(1, 1));

    if let Some(output) = snapshot
        .surface(&SurfaceId::OUTPUT)
        .filter(|s| s.is_visible())
    {
        draw_boot_log(frame, output, area, view, &palette, &glyphs);
    }

    let logo_visible = snapshot.is_visible(&SurfaceId::LOGO);
    let main_visible = snapshot.is_visible(&SurfaceId::MAIN_CONTENT);
    if !logo_visible && !main_visible {
        return;
    }

    let logo_height = LOGO.len() as u16;
    let content_height = MAIN_CONTENT.len() as u16 + 2;
    let [_, logo_area, _, content_area, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(logo_height),
        Constraint::Length(1),
        Constraint::Length(content_height),
        Constraint::Fill(1),
    ])
    .areas(area);

    if logo_visible {
        draw_logo(frame, logo_area, &palette);
    }
    if main_visible {
        draw_main_content(frame, content_area, &palette, &glyphs);
    }
}

/// Index of the first line to show so the last scroll request stays in view.
#[must_use]
pub fn boot_log_scroll_top(output: &SurfaceState, height: u16) -> usize {
    output
        .scroll_anchor()
        .map_or(0, |anchor| anchor.saturating_sub(usize::from(height)))
}

fn draw_boot_log(
    frame: &mut Frame,
    output: &SurfaceState,
    area: Rect,
    view: &ViewState,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let top = boot_log_scroll_top(output, area.height);
    let typing = output.typing_line();
    let show_cursor = cursor_visible(view.tick, view.options);

    let lines: Vec<Line> = output
        .lines()
        .iter()
        .enumerate()
        .skip(top)
        .take(usize::from(area.height))
        .map(|(index, line)| {
            let style = styles::boot_line(palette, line.style());
            let mut spans = vec![Span::styled(line.text().to_string(), style)];
            if typing == Some(index) && show_cursor {
                spans.push(Span::styled(glyphs.cursor, style));
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_logo(frame: &mut Frame, area: Rect, palette: &Palette) {
    let lines: Vec<Line> = LOGO
        .iter()
        .map(|row| Line::styled(*row, styles::logo(palette)))
        .collect();
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_main_content(frame: &mut Frame, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let text_style = Style::default().fg(palette.text_primary);
    let rule_width = usize::from(logo_width());

    let mut lines = vec![Line::styled(
        glyphs.rule.repeat(rule_width),
        Style::default().fg(palette.bg_border),
    )];
    lines.extend(MAIN_CONTENT.iter().map(|row| Line::styled(*row, text_style)));
    lines.push(Line::from(vec![
        Span::styled(format!("{} ", glyphs.prompt), styles::key_highlight(palette)),
        Span::styled("r", styles::key_highlight(palette)),
        Span::styled(" reboot   ", styles::key_hint(palette)),
        Span::styled("q", styles::key_highlight(palette)),
        Span::styled(" disconnect", styles::key_hint(palette)),
    ]));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}
