//! Boot screen render tests using the vt100 virtual terminal.


use std::time::Duration;

use neon_engine::{
    App, Mounts, Page, PageSurface, PlaybackTiming, Script, StyleTag, Surface, SurfaceId, Targets,
};
use neon_tui::{LOGO, MAIN_CONTENT, Palette, UiOptions, ViewState, draw};
use ratatui::Terminal;
use ratatui::style::Color;

use vt100_backend::VT100Backend;

const WIDTH: u16 = 60;
const HEIGHT: u16 = 20;

fn render(page: &Page, view: ViewState) -> Terminal<VT100Backend> {
    let snapshot = page.snapshot();
    let mut terminal =
        Terminal::new(VT100Backend::new(WIDTH, HEIGHT)).expect("failed to create terminal");
    terminal
        .draw(|frame| draw(frame, &snapshot, &view))
        .expect("failed to draw");
    terminal
}

fn type_line(output: &mut PageSurface, text: &str, style: Option<&StyleTag>, finished: bool) {
    let line = output.append_line(style);
    for ch in text.chars() {
        output.append_char(line, ch);
    }
    if finished {
        output.append_break(line);
    }
}

fn boot_page() -> (Page, Targets<PageSurface>) {
    let page = Page::with_boot_mounts();
    let targets = Targets::resolve(&page).expect("boot mounts present");
    (page, targets)
}

fn to_vt100(color: Color) -> vt100::Color {
    match color {
        Color::Rgb(r, g, b) => vt100::Color::Rgb(r, g, b),
        other => panic!("palette color {other:?} is not RGB"),
    }
}

#[test]
fn boot_log_shows_typed_lines() {
    let (page, mut targets) = boot_page();
    type_line(&mut targets.output, "INITIALIZING NEON_CORE...", None, true);
    type_line(&mut targets.output, "MEMORY CHECK", None, false);

    let terminal = render(&page, ViewState::default());
    let screen = terminal.backend();

    assert_eq!(screen.find_row("INITIALIZING NEON_CORE..."), Some(1));
    assert_eq!(screen.find_row("MEMORY CHECK"), Some(2));
    assert!(screen.find_row(LOGO[0].trim()).is_none());
    assert!(screen.find_row(MAIN_CONTENT[0]).is_none());
}

#[test]
fn typing_line_carries_the_cursor() {
    let (page, mut targets) = boot_page();
    type_line(&mut targets.output, "DONE", None, true);
    type_line(&mut targets.output, "LOADIN", None, false);

    let view = ViewState {
        options: UiOptions {
            ascii_only: true,
            ..UiOptions::default()
        },
        tick: 0,
    };
    let terminal = render(&page, view);
    let screen = terminal.backend();

    assert_eq!(screen.row(1).trim(), "DONE");
    assert_eq!(screen.row(2).trim(), "LOADIN_");
}

#[test]
fn cursor_is_hidden_on_the_off_phase() {
    let (page, mut targets) = boot_page();
    type_line(&mut targets.output, "LOADIN", None, false);

    let view = ViewState {
        options: UiOptions {
            ascii_only: true,
            ..UiOptions::default()
        },
        tick: 30,
    };
    let terminal = render(&page, view);
    let screen = terminal.backend();

    assert_eq!(screen.row(1).trim(), "LOADIN");
}

#[test]
fn tagged_lines_use_their_palette_colors() {
    let (page, mut targets) = boot_page();
    type_line(&mut targets.output, "plain line", None, true);
    type_line(
        &mut targets.output,
        "WARNING: ICE DETECTED",
        Some(&StyleTag::WARNING),
        true,
    );
    type_line(
        &mut targets.output,
        "> session opened",
        Some(&StyleTag::LOG_ENTRY),
        true,
    );

    let terminal = render(&page, ViewState::default());
    let screen = terminal.backend();
    let palette = Palette::standard();

    assert_eq!(
        screen.fg_of("plain line"),
        Some(to_vt100(palette.text_primary))
    );
    assert_eq!(
        screen.fg_of("WARNING: ICE DETECTED"),
        Some(to_vt100(palette.warning))
    );
    assert_eq!(
        screen.fg_of("> session opened"),
        Some(to_vt100(palette.accent))
    );
}

#[test]
fn reveal_swaps_boot_log_for_logo() {
    let (page, mut targets) = boot_page();
    type_line(&mut targets.output, "INITIALIZING NEON_CORE...", None, true);
    targets.reveal();

    let terminal = render(&page, ViewState::default());
    let screen = terminal.backend();

    assert!(screen.find_row("INITIALIZING NEON_CORE...").is_none());
    let logo_row = screen.find_row(LOGO[1]).expect("logo drawn");
    let content_row = screen.find_row(MAIN_CONTENT[0]).expect("main content drawn");
    assert!(content_row > logo_row);
    assert!(screen.find_row("reboot").is_some());
}

#[test]
fn boot_log_follows_scroll_requests() {
    let (page, mut targets) = boot_page();
    for n in 0..30 {
        type_line(&mut targets.output, &format!("line {n:02}"), None, true);
    }

    // Before any scroll request the log is pinned to the top.
    let terminal = render(&page, ViewState::default());
    let screen = terminal.backend();
    assert_eq!(screen.row(1).trim(), "line 00");

    page.scroll_to_bottom(&SurfaceId::OUTPUT);
    let terminal = render(&page, ViewState::default());
    let screen = terminal.backend();

    // 18 usable rows inside the margin: lines 12..=29 are shown.
    assert_eq!(screen.row(1).trim(), "line 12");
    assert_eq!(screen.row(HEIGHT - 2).trim(), "line 29");
    assert!(screen.find_row("line 11").is_none());
}

#[test]
fn missing_surfaces_render_nothing() {
    let page = Page::new();
    page.mount(SurfaceId::OUTPUT, true);
    assert!(page.surface(&SurfaceId::LOGO).is_none());

    let terminal = render(&page, ViewState::default());
    let screen = terminal.backend();
    assert!(screen.rows().iter().all(|row| row.trim().is_empty()));
}

#[tokio::test(start_paused = true)]
async fn full_boot_ends_on_the_logo() {
    let mut app = App::new(Script::neon_core(), PlaybackTiming::default());
    app.start().expect("boot mounts present");

    tokio::time::sleep(Duration::from_millis(600)).await;
    let terminal = render(app.page(), ViewState::default());
    let screen = terminal.backend();
    assert_eq!(screen.find_row("Initializing NEON_CORE v0.9.5..."), Some(1));
    assert!(screen.find_row(LOGO[1]).is_none());

    tokio::time::sleep(Duration::from_secs(10)).await;
    let terminal = render(app.page(), ViewState::default());
    let screen = terminal.backend();
    assert!(screen.find_row(LOGO[1]).is_some());
    assert!(screen.find_row(MAIN_CONTENT[0]).is_some());

    app.shutdown().await;
}
