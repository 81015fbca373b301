use std::time::Instant;

use rand::Rng;
use rand::seq::SliceRandom;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph};

use crate::model::distortion::{MAX_LEVEL, Warp, display_time};
use crate::model::timer::{TimerMode, TimerStatus};
use crate::tui::app::App;
use crate::util::unicode::display_width;

const NOISE_GLYPHS: &[&str] = &["\u{2591}", "\u{2592}", "\u{00B7}", ":", "\u{2237}", "\u{2058}"];
const CONFETTI_GLYPHS: &[&str] = &["*", "\u{2726}", "\u{2022}", "+", "\u{25C6}", "~"];

pub fn render_focus_view(frame: &mut Frame, app: &mut App, area: Rect, now: Instant) {
    let level = app.engine.level();
    let warp = Warp::compute(level, app.phase_ms(now), app.engine.drift(), &mut app.rng);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // mode row + tagline
            Constraint::Min(3),    // clock
            Constraint::Length(1), // progress
            Constraint::Length(1), // spacer
            Constraint::Length(2), // distortion summary
        ])
        .split(area);

    if warp.noise {
        render_noise(frame, app, area);
    }

    render_modes(frame, app, chunks[0]);
    render_clock(frame, app, chunks[1], &warp);
    render_progress(frame, app, chunks[2]);
    render_distortion(frame, app, chunks[4]);

    if app.engine.is_celebrating() {
        render_confetti(frame, app, area, now);
    }
}

fn render_modes(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let session = app.engine.session();
    let mut spans = vec![Span::styled(" ", Style::default().bg(bg))];
    for mode in TimerMode::ALL {
        let style = if mode == session.mode {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };
        spans.push(Span::styled(format!(" {} ", mode.label()), style));
        spans.push(Span::styled(" ", Style::default().bg(bg)));
    }

    let (status, color) = match session.status {
        TimerStatus::Idle => ("ready", app.theme.dim),
        TimerStatus::Running => ("running", app.theme.green),
        TimerStatus::Paused => ("paused", app.theme.yellow),
        TimerStatus::Completed => ("complete", app.theme.highlight),
    };
    spans.push(Span::styled(
        format!("  {}", status),
        Style::default().fg(color).bg(bg).add_modifier(Modifier::BOLD),
    ));

    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled(
            format!("  {}", session.mode.tagline()),
            Style::default().fg(app.theme.dim).bg(bg).add_modifier(Modifier::ITALIC),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

/// The countdown, pushed around by the active effects.
fn render_clock(frame: &mut Frame, app: &mut App, area: Rect, warp: &Warp) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let remaining = app.engine.session().remaining_secs;
    let shown = display_time(remaining, app.engine.level(), &mut app.rng);
    let text = letter_spaced(&shown);
    let text_w = display_width(&text) as i32;

    let color = if warp.hue > 0 {
        let palette = app.theme.hue_cycle();
        palette[warp.hue % palette.len()]
    } else {
        app.theme.text_bright
    };
    let mut style = Style::default().fg(color);
    if warp.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if warp.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if warp.dim {
        style = style.add_modifier(Modifier::DIM);
    }

    let center_x = area.x as i32 + (area.width as i32 - text_w) / 2;
    let x = center_x + warp.sway as i32 + warp.drift.0 as i32 + warp.slant as i32;
    let y = area.y as i32 + area.height as i32 / 2 + warp.drift.1 as i32;

    let max_x = (area.x + area.width) as i32 - text_w.min(area.width as i32);
    let x = x.clamp(area.x as i32, max_x.max(area.x as i32)) as u16;
    let y = y.clamp(area.y as i32, (area.y + area.height - 1) as i32) as u16;
    let rect = Rect::new(x, y, (text_w as u16).min(area.x + area.width - x), 1);
    frame.render_widget(Paragraph::new(Span::styled(text, style)), rect);

    // Skew leaves a trailing shadow on the line below
    if warp.italic && y + 1 < area.y + area.height {
        let shadow = Rect::new(rect.x.saturating_sub(warp.slant).max(area.x), y + 1, rect.width, 1);
        let line = "\u{2581}".repeat(rect.width as usize);
        frame.render_widget(
            Paragraph::new(Span::styled(line, Style::default().fg(app.theme.dim))),
            shadow.intersection(area),
        );
    }
}

/// "25:00" → "2 5 : 0 0"
fn letter_spaced(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 2);
    for (i, c) in s.chars().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

fn render_progress(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.engine.session();
    let inner = Rect::new(
        area.x + area.width / 8,
        area.y,
        area.width - area.width / 4,
        area.height,
    );
    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(app.theme.highlight)
                .bg(app.theme.selection_bg),
        )
        .ratio(session.progress().clamp(0.0, 1.0))
        .label(Span::styled(
            format!("{}%", (session.progress() * 100.0).round() as u32),
            Style::default().fg(app.theme.text_bright),
        ));
    frame.render_widget(gauge, inner);
}

fn render_distortion(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let distortion = app.engine.distortion();
    let level = distortion.effective_level();

    let mut meter = String::new();
    for i in 1..=MAX_LEVEL {
        meter.push(if i <= level { '\u{25A0}' } else { '\u{25A1}' });
    }
    let meter_color = match level {
        0 => app.theme.dim,
        1..=3 => app.theme.cyan,
        4..=6 => app.theme.yellow,
        7..=8 => app.theme.purple,
        _ => app.theme.red,
    };

    let label = Style::default().fg(app.theme.dim).bg(bg);
    let value = Style::default().fg(app.theme.text_bright).bg(bg);
    // Newest effect first so it survives clipping
    let effects: Vec<&str> = distortion.effects().iter().rev().map(|e| e.label()).collect();
    let effects_text = if effects.is_empty() {
        "calm".to_string()
    } else {
        effects.join(" \u{00B7} ")
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("  warp ", label),
            Span::styled(meter, Style::default().fg(meter_color).bg(bg)),
            Span::styled(format!(" {:>2}", level), value),
            Span::styled("   distractions ", label),
            Span::styled(distortion.distraction_count().to_string(), value),
            Span::styled("   manual ", label),
            Span::styled(distortion.manual_level().to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("  ", label),
            Span::styled(effects_text, Style::default().fg(app.theme.text).bg(bg)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

/// Meltdown: a sparse field of static behind everything.
fn render_noise(frame: &mut Frame, app: &mut App, area: Rect) {
    let color = app.theme.dim;
    let buf = frame.buffer_mut();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if !app.rng.gen_bool(0.12) {
                continue;
            }
            if let Some(cell) = buf.cell_mut((x, y)) {
                let glyph = NOISE_GLYPHS.choose(&mut app.rng).copied().unwrap_or(".");
                cell.set_symbol(glyph).set_fg(color);
            }
        }
    }
}

/// Completion celebration: confetti that thins out as it ends.
fn render_confetti(frame: &mut Frame, app: &mut App, area: Rect, now: Instant) {
    let density = 0.02 + 0.08 * app.engine.celebration_left(now) as f64;
    let palette = app.theme.hue_cycle();
    let buf = frame.buffer_mut();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if !app.rng.gen_bool(density.clamp(0.0, 1.0)) {
                continue;
            }
            if let Some(cell) = buf.cell_mut((x, y)) {
                let glyph = CONFETTI_GLYPHS.choose(&mut app.rng).copied().unwrap_or("*");
                let color = palette[app.rng.gen_range(0..palette.len())];
                cell.set_symbol(glyph).set_fg(color);
            }
        }
    }

    let banner = " \u{2728} Session complete! \u{2728} ";
    let w = display_width(banner) as u16;
    if area.height > 0 && area.width >= w {
        let rect = Rect::new(area.x + (area.width - w) / 2, area.y + area.height / 3, w, 1);
        frame.render_widget(
            Paragraph::new(Span::styled(
                banner,
                Style::default()
                    .fg(app.theme.background)
                    .bg(app.theme.highlight)
                    .add_modifier(Modifier::BOLD),
            )),
            rect,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{TERM_H, TERM_W, render_to_string, test_app};
    use std::time::Duration;

    fn render(app: &mut App) -> String {
        render_to_string(TERM_W, TERM_H, |frame, area| {
            render_focus_view(frame, app, area, Instant::now())
        })
    }

    #[test]
    fn letter_spacing() {
        assert_eq!(letter_spaced("25:00"), "2 5 : 0 0");
        assert_eq!(letter_spaced(""), "");
    }

    #[test]
    fn calm_clock_shows_remaining_time() {
        let (_dir, mut app) = test_app();
        let out = render(&mut app);
        assert!(out.contains("2 5 : 0 0"));
        assert!(out.contains("calm"));
        assert!(out.contains("ready"));
    }

    #[test]
    fn scrambled_clock_hides_digits_but_not_state() {
        let (_dir, mut app) = test_app();
        app.engine.set_level(9, Instant::now());
        let out = render(&mut app);
        assert!(!out.contains("2 5 : 0 0"));
        assert!(out.contains("scramble"));
        assert_eq!(app.engine.session().remaining_secs, 25 * 60);
    }

    #[test]
    fn lowering_to_zero_restores_the_clock() {
        let (_dir, mut app) = test_app();
        let now = Instant::now();
        app.engine.set_level(10, now);
        render(&mut app);
        app.engine.set_level(0, now);
        let out = render(&mut app);
        assert!(out.contains("2 5 : 0 0"));
        assert!(out.contains("calm"));
    }

    #[test]
    fn completion_shows_celebration() {
        let (_dir, mut app) = test_app();
        let start = Instant::now();
        app.engine.select_mode(TimerMode::Custom, 1).unwrap();
        app.engine.start(start, chrono::Utc::now());
        app.tick(start + Duration::from_millis(1100));
        assert!(app.engine.is_celebrating());
        assert_eq!(app.sessions.len(), 1);
        let out = render(&mut app);
        assert!(out.contains("Session complete!"));
    }
}
