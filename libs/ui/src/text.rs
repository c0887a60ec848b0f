//! Thin wrappers over `u8g2_fonts::FontRenderer`.

use crate::rect::Rect;
use embedded_graphics::{Drawable, pixelcolor::BinaryColor, prelude::DrawTarget, prelude::Point};
use embedded_text::{
    TextBox,
    alignment::{HorizontalAlignment as BoxAlignment, VerticalAlignment},
    style::TextBoxStyleBuilder,
};
use u8g2_fonts::{
    Font, FontRenderer, U8g2TextStyle,
    types::{FontColor, HorizontalAlignment, VerticalPosition},
};

/// Render `text` anchored at `anchor`. Glyphs missing from the font are
/// skipped rather than treated as a drawing failure.
pub fn render<F, D>(
    display: &mut D,
    text: &str,
    anchor: Point,
    vertical: VerticalPosition,
    horizontal: HorizontalAlignment,
    color: BinaryColor,
) -> Result<(), D::Error>
where
    F: Font,
    D: DrawTarget<Color = BinaryColor>,
{
    match FontRenderer::new::<F>().render_aligned(
        text,
        anchor,
        vertical,
        horizontal,
        FontColor::Transparent(color),
        display,
    ) {
        Ok(_) => Ok(()),
        Err(u8g2_fonts::Error::DisplayError(e)) => Err(e),
        Err(u8g2_fonts::Error::GlyphNotFound(c)) => {
            log::trace!("Skipped text '{text}': no glyph for {c:?}");
            Ok(())
        }
        Err(u8g2_fonts::Error::BackgroundColorNotSupported) => {
            log::trace!("Skipped text '{text}': font needs a transparent background");
            Ok(())
        }
    }
}

/// Render `text` centred in `area`.
pub fn centered<F, D>(display: &mut D, text: &str, area: Rect, color: BinaryColor) -> Result<(), D::Error>
where
    F: Font,
    D: DrawTarget<Color = BinaryColor>,
{
    render::<F, D>(
        display,
        text,
        area.center(),
        VerticalPosition::Center,
        HorizontalAlignment::Center,
        color,
    )
}

/// Render `text` left-aligned and vertically centred in `area`, `pad`
/// pixels in from the left edge.
pub fn left<F, D>(
    display: &mut D,
    text: &str,
    area: Rect,
    pad: i16,
    color: BinaryColor,
) -> Result<(), D::Error>
where
    F: Font,
    D: DrawTarget<Color = BinaryColor>,
{
    render::<F, D>(
        display,
        text,
        Point::new(i32::from(area.x) + i32::from(pad), area.center().y),
        VerticalPosition::Center,
        HorizontalAlignment::Left,
        color,
    )
}

/// Render `text` right-aligned and vertically centred in `area`.
pub fn right<F, D>(
    display: &mut D,
    text: &str,
    area: Rect,
    pad: i16,
    color: BinaryColor,
) -> Result<(), D::Error>
where
    F: Font,
    D: DrawTarget<Color = BinaryColor>,
{
    render::<F, D>(
        display,
        text,
        Point::new(i32::from(area.right()) - i32::from(pad), area.center().y),
        VerticalPosition::Center,
        HorizontalAlignment::Right,
        color,
    )
}

/// Word-wrap `text` inside `area`, centred both ways. Lines that do not
/// fit are clipped.
pub fn wrapped<F, D>(
    display: &mut D,
    font: F,
    text: &str,
    area: Rect,
    color: BinaryColor,
) -> Result<(), D::Error>
where
    F: Font,
    D: DrawTarget<Color = BinaryColor>,
{
    let character_style = U8g2TextStyle::new(font, color);
    let textbox_style = TextBoxStyleBuilder::new()
        .alignment(BoxAlignment::Center)
        .vertical_alignment(VerticalAlignment::Middle)
        .build();
    TextBox::with_textbox_style(text, area.into(), character_style, textbox_style).draw(display)?;
    Ok(())
}

/// Keep at most `max` characters, dropping the excess silently.
pub fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// The last `max` characters of `text`, for fields that scroll left.
pub fn tail(text: &str, max: usize) -> &str {
    let count = text.chars().count();
    if count <= max {
        return text;
    }
    text.char_indices()
        .nth(count - max)
        .map_or(text, |(index, _)| &text[index..])
}
