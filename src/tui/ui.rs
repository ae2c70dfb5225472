use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};

use super::state::AppState;
use crate::item::Item;
use crate::texture::Texture;

/// Unselected games are drawn at this fraction of the selected size
/// (215x121 against 320x180).
const SMALL_SCALE: f32 = 0.67;
/// Background brightness behind the carousel.
const BACKGROUND_DIM: f32 = 0.35;
const UI_COLOR: Color = Color::White;

/// Main render function.  Text over the background is drawn as styled spans
/// so the backdrop shows through around it.
pub fn render(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(2),
        ])
        .split(f.area());

    if let Some(background) = &state.background {
        f.render_widget(
            TextureView::new(background).dimmed(BACKGROUND_DIM),
            chunks[1],
        );
    }

    let header = Paragraph::new(format!("MLB games · {}", state.date))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(header, chunks[0]);

    if state.carousel.is_empty() {
        render_empty(f, chunks[1]);
    } else {
        render_carousel(f, chunks[1], state);
    }

    render_status_bar(f, chunks[2], state);
}

fn render_empty(f: &mut Frame, area: Rect) {
    let message = Paragraph::new(Span::styled(
        "No games to show",
        Style::default().fg(Color::Yellow),
    ))
    .alignment(Alignment::Center);
    f.render_widget(message, centered(area, area.width, 1));
}

/// Arrows on both edges, `page_size` evenly spaced slots in between.
fn render_carousel(f: &mut Frame, area: Rect, state: &AppState) {
    let scroll = state.carousel.scroll();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(area);

    if scroll.has_hidden_before() {
        render_arrow(f, columns[0], "◀");
    }
    if scroll.has_hidden_after() {
        render_arrow(f, columns[2], "▶");
    }

    let page = scroll.page_size() as u32;
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..page).map(|_| Constraint::Ratio(1, page)))
        .split(columns[1]);

    for ((item, selected), slot) in state.carousel.visible_items().zip(slots.iter()) {
        render_game(f, *slot, item, selected);
    }
}

fn render_arrow(f: &mut Frame, area: Rect, glyph: &str) {
    let arrow = Paragraph::new(Span::styled(
        glyph,
        Style::default().fg(UI_COLOR).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    f.render_widget(arrow, centered(area, area.width, 1));
}

/// The selected game is framed, drawn full size, with its title above and
/// its description below.  The others get a smaller image only.
fn render_game(f: &mut Frame, slot: Rect, item: &Item, selected: bool) {
    let inner = Rect {
        x: slot.x + 1,
        width: slot.width.saturating_sub(2),
        ..slot
    };
    let (width, height) = image_cells(inner.width);

    if !selected {
        let (w, h) = (
            (width as f32 * SMALL_SCALE) as u16,
            (height as f32 * SMALL_SCALE) as u16,
        );
        if let Some(texture) = item.loaded_texture() {
            f.render_widget(TextureView::new(texture), centered(inner, w, h));
        }
        return;
    }

    let image = centered(inner, width, height);
    let outline = Rect {
        x: image.x.saturating_sub(1),
        y: image.y.saturating_sub(1),
        width: image.width + 2,
        height: image.height + 2,
    }
    .intersection(slot);
    f.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(UI_COLOR)),
        outline,
    );
    if let Some(texture) = item.loaded_texture() {
        f.render_widget(TextureView::new(texture), image);
    }

    let above = Rect {
        y: slot.y,
        height: outline.y.saturating_sub(slot.y),
        ..inner
    };
    let title = Paragraph::new(Span::styled(
        item.title(),
        Style::default().fg(UI_COLOR).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(title, bottom_lines(above, 3));

    let below_y = outline.y + outline.height;
    let below = Rect {
        y: below_y,
        height: (slot.y + slot.height).saturating_sub(below_y),
        ..inner
    };
    let description = Paragraph::new(Span::styled(
        item.description(),
        Style::default().fg(UI_COLOR),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(description, below);
}

/// Render the status bar at the bottom.
fn render_status_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let (text, style) = if let Some(error) = state.error_message() {
        (format!(" Error: {error}"), Style::default().fg(Color::Red))
    } else if let Some(notice) = state.image_notice() {
        (format!(" {notice}"), Style::default().fg(Color::Yellow))
    } else {
        let scroll = state.carousel.scroll();
        (
            format!(
                " Game {}/{} | ←/→: Browse | Esc: Quit",
                (scroll.selected() + 1).min(scroll.count()),
                scroll.count()
            ),
            Style::default().fg(Color::Green),
        )
    };

    let status = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(status, area);
}

// ---------------------------------------------------------------------------
// Layout helpers
// ---------------------------------------------------------------------------

/// Cell size of a 16:9 image `width` cells wide.  Half blocks give two
/// pixel rows per cell.
fn image_cells(width: u16) -> (u16, u16) {
    let height = (f32::from(width) * 9.0 / 32.0).round() as u16;
    (width, height.max(1))
}

/// A `width` x `height` rect centered in `area`, clipped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// The last `lines` rows of `area`.
fn bottom_lines(area: Rect, lines: u16) -> Rect {
    let height = lines.min(area.height);
    Rect {
        y: area.y + area.height - height,
        height,
        ..area
    }
}

// ---------------------------------------------------------------------------
// Texture widget
// ---------------------------------------------------------------------------

/// Draws a texture with upper-half-block cells: foreground is the top
/// pixel, background the bottom one.
pub struct TextureView<'a> {
    texture: &'a Texture,
    brightness: f32,
}

impl<'a> TextureView<'a> {
    pub fn new(texture: &'a Texture) -> Self {
        Self {
            texture,
            brightness: 1.0,
        }
    }

    pub fn dimmed(mut self, brightness: f32) -> Self {
        self.brightness = brightness.clamp(0.0, 1.0);
        self
    }

    fn color(&self, u: f32, v: f32) -> Color {
        let [r, g, b] = self.texture.sample(u, v);
        let scale = |c: u8| (f32::from(c) * self.brightness) as u8;
        Color::Rgb(scale(r), scale(g), scale(b))
    }
}

impl Widget for TextureView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        if area.is_empty() {
            return;
        }
        let cols = f32::from(area.width);
        let rows = f32::from(area.height) * 2.0;

        for row in 0..area.height {
            for col in 0..area.width {
                let u = (f32::from(col) + 0.5) / cols;
                let top = (f32::from(row) * 2.0 + 0.5) / rows;
                let bottom = (f32::from(row) * 2.0 + 1.5) / rows;
                buf[(area.x + col, area.y + row)]
                    .set_char('▀')
                    .set_fg(self.color(u, top))
                    .set_bg(self.color(u, bottom));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn texture_view_fills_its_area_with_half_blocks() {
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        img.put_pixel(1, 1, Rgba([0, 0, 255, 255]));
        let texture = Texture::from_rgba(img);

        let area = Rect::new(0, 0, 4, 1);
        let mut buf = Buffer::empty(area);
        TextureView::new(&texture).render(area, &mut buf);

        let cell = &buf[(0u16, 0u16)];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
        assert_eq!(cell.bg, Color::Rgb(0, 0, 255));
    }

    #[test]
    fn dimming_scales_colors() {
        let texture = Texture::from_rgba(RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 255])));
        let area = Rect::new(0, 0, 1, 1);
        let mut buf = Buffer::empty(area);
        TextureView::new(&texture).dimmed(0.5).render(area, &mut buf);
        assert_eq!(buf[(0u16, 0u16)].fg, Color::Rgb(100, 50, 25));
    }

    #[test]
    fn centered_rect_is_clipped() {
        let area = Rect::new(10, 10, 20, 4);
        assert_eq!(centered(area, 10, 2), Rect::new(15, 11, 10, 2));
        assert_eq!(centered(area, 40, 40), area);
    }

    #[test]
    fn image_cells_keep_wide_aspect() {
        assert_eq!(image_cells(32), (32, 9));
        assert_eq!(image_cells(1), (1, 1));
    }
}
