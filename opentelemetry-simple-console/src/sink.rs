//! Console sinks.
//!
//! A [`ConsoleSink`] is the device the exporter draws on: it accepts text
//! and lines and carries a current foreground and background color. Sinks
//! are not required to be thread safe; the exporter serializes access to
//! the one it owns.
use crate::color::Color;
use crossterm::style::{Color as TermColor, Print, SetBackgroundColor, SetForegroundColor};
use crossterm::queue;
use std::fmt;
use std::io::{self, Stdout, Write};

/// Output device the exporter renders records onto.
pub trait ConsoleSink {
    /// Writes `text` without a line break.
    fn write_text(&mut self, text: &str) -> io::Result<()>;

    /// Writes `text` followed by a line break.
    fn write_line(&mut self, text: &str) -> io::Result<()>;

    /// Current foreground color.
    fn foreground_color(&self) -> Color;

    /// Changes the foreground color for subsequent text.
    fn set_foreground_color(&mut self, color: Color) -> io::Result<()>;

    /// Current background color.
    fn background_color(&self) -> Color;

    /// Changes the background color for subsequent text.
    fn set_background_color(&mut self, color: Color) -> io::Result<()>;
}

impl<S: ConsoleSink + ?Sized> ConsoleSink for Box<S> {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        (**self).write_text(text)
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        (**self).write_line(text)
    }

    fn foreground_color(&self) -> Color {
        (**self).foreground_color()
    }

    fn set_foreground_color(&mut self, color: Color) -> io::Result<()> {
        (**self).set_foreground_color(color)
    }

    fn background_color(&self) -> Color {
        (**self).background_color()
    }

    fn set_background_color(&mut self, color: Color) -> io::Result<()> {
        (**self).set_background_color(color)
    }
}

/// Which color changes an [`AnsiSink`] forwards to its writer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum AnsiColors {
    /// Foreground and background.
    #[default]
    Full,
    /// Foreground only; background changes are tracked but not emitted.
    ForegroundOnly,
    /// No escape sequences at all.
    Disabled,
}

/// A [`ConsoleSink`] over any [`Write`], expressing colors as ANSI escape
/// sequences.
///
/// Terminals cannot be asked for their current colors, so the sink tracks
/// the last color it set, starting from [`Color::Default`].
pub struct AnsiSink<W: Write> {
    writer: W,
    colors: AnsiColors,
    foreground: Color,
    background: Color,
}

impl<W: Write> fmt::Debug for AnsiSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnsiSink")
            .field("colors", &self.colors)
            .field("foreground", &self.foreground)
            .field("background", &self.background)
            .finish()
    }
}

impl AnsiSink<Stdout> {
    /// Standard output with foreground coloring only.
    pub fn stdout() -> Self {
        AnsiSink::new(io::stdout()).with_colors(AnsiColors::ForegroundOnly)
    }
}

impl Default for AnsiSink<Stdout> {
    fn default() -> Self {
        AnsiSink::stdout()
    }
}

impl<W: Write> AnsiSink<W> {
    /// Wraps `writer`, emitting both foreground and background colors.
    pub fn new(writer: W) -> Self {
        AnsiSink {
            writer,
            colors: AnsiColors::Full,
            foreground: Color::Default,
            background: Color::Default,
        }
    }

    /// Selects which color changes reach the writer.
    pub fn with_colors(mut self, colors: AnsiColors) -> Self {
        self.colors = colors;
        self
    }

    /// Borrows the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Unwraps the sink, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ConsoleSink for AnsiSink<W> {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        queue!(self.writer, Print(text))
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        queue!(self.writer, Print(text), Print('\n'))?;
        self.writer.flush()
    }

    fn foreground_color(&self) -> Color {
        self.foreground
    }

    fn set_foreground_color(&mut self, color: Color) -> io::Result<()> {
        if self.colors != AnsiColors::Disabled {
            queue!(self.writer, SetForegroundColor(term_color(color)))?;
        }
        self.foreground = color;
        Ok(())
    }

    fn background_color(&self) -> Color {
        self.background
    }

    fn set_background_color(&mut self, color: Color) -> io::Result<()> {
        if self.colors == AnsiColors::Full {
            queue!(self.writer, SetBackgroundColor(term_color(color)))?;
        }
        self.background = color;
        Ok(())
    }
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Default => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::DarkBlue => TermColor::DarkBlue,
        Color::DarkGreen => TermColor::DarkGreen,
        Color::DarkCyan => TermColor::DarkCyan,
        Color::DarkRed => TermColor::DarkRed,
        Color::DarkMagenta => TermColor::DarkMagenta,
        Color::DarkYellow => TermColor::DarkYellow,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::Blue => TermColor::Blue,
        Color::Green => TermColor::Green,
        Color::Cyan => TermColor::Cyan,
        Color::Red => TermColor::Red,
        Color::Magenta => TermColor::Magenta,
        Color::Yellow => TermColor::Yellow,
        Color::White => TermColor::White,
    }
}
