//! Neon ASCII banner with gradient (TALK-GRAPH).
//! Uses figlet's bundled standard font.

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{self, Write, stdout};
use tracing::debug;

/// Neon Purple (#bc13fe).
const NEON_PURPLE: (u8, u8, u8) = (0xbc, 0x13, 0xfe);
/// Cyber Green (#0ff0fc).
const CYBER_GREEN: (u8, u8, u8) = (0x0f, 0xf0, 0xfc);

const TITLE: &str = "TALK-GRAPH";

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

/// Banner art, or the plain title if the font cannot render it.
fn render_title() -> String {
    FIGfont::standard()
        .ok()
        .and_then(|font| font.convert(TITLE).map(|figure| figure.to_string()))
        .unwrap_or_else(|| TITLE.to_string())
}

/// Queue the gradient art, then the version line, into `out`. One flush at the end.
fn write_banner<W: Write>(out: &mut W) -> io::Result<()> {
    let art = render_title();
    let lines: Vec<&str> = art.lines().collect();
    let last = lines.len().saturating_sub(1).max(1) as f64;

    for (i, line) in lines.iter().enumerate() {
        let (r, g, b) = lerp_rgb(NEON_PURPLE, CYBER_GREEN, (i as f64 / last).min(1.0));
        queue!(
            out,
            SetForegroundColor(Color::Rgb { r, g, b }),
            Print(line),
            Print("\r\n"),
            ResetColor
        )?;
    }

    let (r, g, b) = CYBER_GREEN;
    queue!(
        out,
        SetForegroundColor(Color::Rgb { r, g, b }),
        Print(format!("v{}\r\n", env!("CARGO_PKG_VERSION"))),
        Print("Powered by Rust\r\n"),
        ResetColor
    )?;
    out.flush()
}

/// Prints the welcome banner with a gradient from Neon Purple to Cyber Green,
/// then version and "Powered by Rust".
pub fn print_welcome() {
    if let Err(e) = write_banner(&mut stdout().lock()) {
        debug!(error = %e, "banner not printed");
    }
}
