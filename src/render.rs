//! Text presentation of the display, one character per magnified pixel.

use plum8::{Context, Plum8};

pub const ON: char = '#';
pub const OFF: char = '.';

/// Render the display at `scale` characters per pixel, rows end with `\n`
pub fn render<C: Context>(chip: &Plum8<C>, scale: usize) -> String {
    let width = plum8::WIDTH * scale + 1;
    let mut out = String::with_capacity(width * plum8::HEIGHT * scale);
    for row in chip.draw_screen(scale) {
        out.extend(row.map(|&p| if p { ON } else { OFF }));
        out.push('\n');
    }
    out
}
