//! Draws the device screen: a fixed `columns × rows` bordered box centred in
//! the terminal.
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │Model: gemini-2.5-flash-lite          │  title
//! │You: hi                               │
//! │Bot: Hello! How are you today?        │  chat viewport
//! │                                      │
//! │Thinking...                           │  banner (only when set)
//! │> why is the sky blue                 │  input (up to a third of the box)
//! └──────────────────────────────────────┘
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};

use crate::core::render::RenderModel;
use crate::core::state::ChatSession;
use crate::tui::TuiState;

/// Areas inside the device border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    pub title: Rect,
    pub chat: Rect,
    pub banner: Rect,
    pub input: Rect,
}

/// The device box, centred in `frame_area` and clipped to it.
pub fn device_rect(frame_area: Rect, columns: u16, rows: u16) -> Rect {
    let width = columns.min(frame_area.width);
    let height = rows.min(frame_area.height);
    Rect::new(
        frame_area.x + (frame_area.width - width) / 2,
        frame_area.y + (frame_area.height - height) / 2,
        width,
        height,
    )
}

/// Splits the inside of the device box between title, chat, banner and input.
pub fn screen_areas(inner: Rect, model: &RenderModel) -> ScreenAreas {
    use Constraint::{Length, Min};

    let max_input = (inner.height / 3).max(1);
    let input_height = (model.input_lines.len() as u16).clamp(1, max_input);
    let banner_height = u16::from(model.banner.is_some());

    let [title, chat, banner, input] = Layout::vertical([
        Length(1),
        Min(0),
        Length(banner_height),
        Length(input_height),
    ])
    .areas(inner);

    ScreenAreas {
        title,
        chat,
        banner,
        input,
    }
}

pub fn draw_ui(frame: &mut Frame, session: &ChatSession, tui: &mut TuiState) {
    let model = session.render_model();
    let device = device_rect(frame.area(), tui.columns, tui.rows);
    let block = Block::bordered().border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(device);
    frame.render_widget(block, device);

    let areas = screen_areas(inner, &model);
    // Cached for scroll clamping between frames
    tui.chat_rows = areas.chat.height;
    tui.scroll_back = tui.scroll_back.min(model.max_scroll_back(usize::from(areas.chat.height)));

    frame.render_widget(
        Paragraph::new(model.title.as_str()).style(Style::default().add_modifier(Modifier::BOLD)),
        areas.title,
    );

    let chat: Vec<Line> = model
        .visible_chat(usize::from(areas.chat.height), tui.scroll_back)
        .iter()
        .map(|line| Line::raw(line.as_str()))
        .collect();
    frame.render_widget(Paragraph::new(chat), areas.chat);

    if let Some(banner) = &model.banner {
        frame.render_widget(
            Paragraph::new(banner.as_str()).style(Style::default().fg(Color::Black).bg(Color::Yellow)),
            areas.banner,
        );
    }

    // Keep the end of a long input visible
    let skip = model
        .input_lines
        .len()
        .saturating_sub(usize::from(areas.input.height));
    let input: Vec<Line> = model.input_lines[skip..]
        .iter()
        .map(|line| Line::raw(line.as_str()))
        .collect();
    let input_style = if session.is_loading {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default().fg(Color::Cyan)
    };
    frame.render_widget(Paragraph::new(input).style(input_style), areas.input);
}

/// Shown instead of the chat when a required setting is missing.
pub fn draw_config_error(frame: &mut Frame, columns: u16, rows: u16, message: &str) {
    let device = device_rect(frame.area(), columns, rows);
    let block = Block::bordered()
        .title("Config error")
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(device);
    frame.render_widget(block, device);

    let width = usize::from(inner.width);
    let mut lines: Vec<Line> = crate::core::layout::wrap(message, width)
        .into_iter()
        .map(Line::from)
        .collect();
    lines.push(Line::raw(""));
    lines.extend(
        crate::core::layout::wrap("Press any key to exit.", width)
            .into_iter()
            .map(|l| Line::from(l).style(Style::default().add_modifier(Modifier::DIM))),
    );
    frame.render_widget(Paragraph::new(lines), inner);
}
