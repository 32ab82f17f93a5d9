//! EMS text attribute parsing (3GPP TS 23.040 section 9.2.3.24.10.1.1).
//!
//! PDU types carry attribute bytes verbatim so that unmodified
//! attributes re-encode exactly; this module provides the structured
//! view of those bytes for presentation layers.

/// One of the sixteen EMS colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmsColor {
    Black,
    DarkGrey,
    DarkRed,
    DarkYellow,
    DarkGreen,
    DarkCyan,
    DarkBlue,
    DarkMagenta,
    Grey,
    White,
    BrightRed,
    BrightYellow,
    BrightGreen,
    BrightCyan,
    BrightBlue,
    BrightMagenta,
}

impl EmsColor {
    pub fn from_nibble(nibble: u8) -> EmsColor {
        use EmsColor::*;
        match nibble & 0x0F {
            0x00 => Black,
            0x01 => DarkGrey,
            0x02 => DarkRed,
            0x03 => DarkYellow,
            0x04 => DarkGreen,
            0x05 => DarkCyan,
            0x06 => DarkBlue,
            0x07 => DarkMagenta,
            0x08 => Grey,
            0x09 => White,
            0x0A => BrightRed,
            0x0B => BrightYellow,
            0x0C => BrightGreen,
            0x0D => BrightCyan,
            0x0E => BrightBlue,
            _ => BrightMagenta,
        }
    }

    /// CSS color value of this EMS color.
    pub fn rgb(self) -> &'static str {
        use EmsColor::*;
        match self {
            Black => "#000000",
            DarkGrey => "#808080",
            DarkRed => "#800000",
            DarkYellow => "#808000",
            DarkGreen => "#008000",
            DarkCyan => "#008080",
            DarkBlue => "#000080",
            DarkMagenta => "#800080",
            Grey => "#C0C0C0",
            White => "#FFFFFF",
            BrightRed => "#FF0000",
            BrightYellow => "#FFFF00",
            BrightGreen => "#00FF00",
            BrightCyan => "#00FFFF",
            BrightBlue => "#0000FF",
            BrightMagenta => "#FF00FF",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    Left,
    Center,
    Right,
    /// Language-dependent default alignment.
    #[default]
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontSize {
    #[default]
    Normal,
    Large,
    Small,
}

/// One formatted run of characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSpan {
    /// First character position the formatting applies to.
    pub start: usize,
    /// One past the last character position; spans with a zero length
    /// byte extend to the end of the text.
    pub end: usize,
    pub alignment: Alignment,
    pub font: FontSize,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub foreground: Option<EmsColor>,
    pub background: Option<EmsColor>,
}

/// Structured view of an EMS attribute byte sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextAttributes {
    pub spans: Vec<AttributeSpan>,
    /// Page background, taken from the first block that carries colors.
    pub page_background: Option<EmsColor>,
}

impl TextAttributes {
    /// Parse raw attribute bytes against a text of `text_len`
    /// characters. Blocks are four bytes, the colors byte being
    /// optional in the final block.
    pub fn parse(attrs: &[u8], text_len: usize) -> TextAttributes {
        let mut result = TextAttributes::default();
        let mut offset = 0;
        while offset + 3 <= attrs.len() {
            let start = attrs[offset] as usize;
            let length = attrs[offset + 1] as usize;
            let format = attrs[offset + 2];
            let colors = attrs.get(offset + 3).copied();
            offset += 4;

            let end = if length == 0 {
                text_len
            } else {
                (start + length).min(text_len)
            };
            let (foreground, background) = match colors {
                Some(byte) => (
                    Some(EmsColor::from_nibble(byte & 0x0F)),
                    Some(EmsColor::from_nibble(byte >> 4)),
                ),
                None => (None, None),
            };
            if result.page_background.is_none() {
                result.page_background = background;
            }
            result.spans.push(AttributeSpan {
                start,
                end,
                alignment: match format & 0x03 {
                    0x00 => Alignment::Left,
                    0x01 => Alignment::Center,
                    0x02 => Alignment::Right,
                    _ => Alignment::Default,
                },
                font: match format & 0x0C {
                    0x04 => FontSize::Large,
                    0x08 => FontSize::Small,
                    _ => FontSize::Normal,
                },
                bold: (format & 0x10) != 0,
                italic: (format & 0x20) != 0,
                underline: (format & 0x40) != 0,
                strikethrough: (format & 0x80) != 0,
                foreground,
                background,
            });
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_block_full_text() {
        let attrs = TextAttributes::parse(&[0x00, 0x00, 0x11, 0x09], 9);
        assert_eq!(attrs.spans.len(), 1);
        let span = &attrs.spans[0];
        assert_eq!((span.start, span.end), (0, 9));
        assert_eq!(span.alignment, Alignment::Center);
        assert!(span.bold);
        assert_eq!(span.foreground, Some(EmsColor::White));
        assert_eq!(span.background, Some(EmsColor::Black));
        assert_eq!(attrs.page_background, Some(EmsColor::Black));
    }

    #[test]
    fn final_block_may_omit_colors() {
        let attrs = TextAttributes::parse(&[0x00, 0x04, 0x54, 0x1A, 0x04, 0x00, 0xA2], 10);
        assert_eq!(attrs.spans.len(), 2);
        assert_eq!(attrs.spans[0].font, FontSize::Large);
        assert!(attrs.spans[0].bold && attrs.spans[0].underline);
        assert_eq!(attrs.spans[0].foreground, Some(EmsColor::BrightRed));
        assert_eq!(attrs.spans[0].background, Some(EmsColor::DarkGrey));
        assert_eq!(attrs.spans[1].alignment, Alignment::Right);
        assert!(attrs.spans[1].italic);
        assert_eq!(attrs.spans[1].foreground, None);
        assert_eq!((attrs.spans[1].start, attrs.spans[1].end), (4, 10));
    }

    #[test]
    fn color_table_matches_ems() {
        assert_eq!(EmsColor::from_nibble(0x0).rgb(), "#000000");
        assert_eq!(EmsColor::from_nibble(0x8).rgb(), "#C0C0C0");
        assert_eq!(EmsColor::from_nibble(0x9).rgb(), "#FFFFFF");
        assert_eq!(EmsColor::from_nibble(0xF).rgb(), "#FF00FF");
    }

    #[test]
    fn span_clamped_to_text_length() {
        let attrs = TextAttributes::parse(&[0x02, 0x20, 0x00, 0x00], 5);
        assert_eq!((attrs.spans[0].start, attrs.spans[0].end), (2, 5));
    }
}
