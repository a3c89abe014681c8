//! Line-level VCD formatting shared by the document emitter and the stream writer.
//!
//! Values live in a 64-bit register. Multi-bit values are printed at the
//! signal's declared width (`b01010101` for an 8-bit 85), single-bit values as
//! one digit glued to the identifier code (`1!`).

use std::io::{self, Write};

use crate::timescale::Timescale;

/// Bit capacity of the value register. Declared widths must be strictly below it.
pub const REGISTER_BITS: u32 = u64::BITS;

/// Generator string written in the `$version` block by default.
pub const DEFAULT_VERSION: &str = concat!("vcdgen ", env!("CARGO_PKG_VERSION"));

/// Format used for the `$date` block when no explicit date is configured.
pub const DATE_FORMAT: &str = "%b %d, %Y";

/// Reasons a value cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// Width of zero bits.
    #[error("width must be at least 1")]
    ZeroWidth,
    /// Width does not fit the value register.
    #[error("width {0} exceeds the 64-bit value register")]
    WidthTooLarge(u32),
    /// Value has bits set above the declared width.
    #[error("value {value} has bits above width {width}")]
    ValueTooWide {
        /// The value.
        value: u64,
        /// The declared width.
        width: u32,
    },
}

/// Checks that `width` is usable with the value register.
pub fn check_width(width: u32) -> Result<(), FormatError> {
    if width == 0 {
        Err(FormatError::ZeroWidth)
    } else if width >= REGISTER_BITS {
        Err(FormatError::WidthTooLarge(width))
    } else {
        Ok(())
    }
}

/// Returns `true` if `value` is representable in `width` bits.
///
/// `width` must already have passed [`check_width`].
pub fn fits(value: u64, width: u32) -> bool {
    value >> width == 0
}

/// Formats `value` as a VCD scalar (`"1"`) or binary vector (`"b0101"`).
pub fn format_value(value: u64, width: u32) -> Result<String, FormatError> {
    check_width(width)?;
    if !fits(value, width) {
        return Err(FormatError::ValueTooWide { value, width });
    }
    if width == 1 {
        Ok(if value & 1 == 1 { "1" } else { "0" }.to_string())
    } else {
        Ok(format!("b{value:0w$b}", w = width as usize))
    }
}

/// Header fields written before the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderOptions {
    /// Text of the `$date` block; the local date at emission time when `None`.
    pub date: Option<String>,
    /// Text of the `$version` block.
    pub version: String,
    /// Resolution of the `#<time>` markers.
    pub timescale: Timescale,
}

impl Default for HeaderOptions {
    fn default() -> Self {
        Self {
            date: None,
            version: DEFAULT_VERSION.to_string(),
            timescale: Timescale::default(),
        }
    }
}

impl HeaderOptions {
    /// The configured date, or today's local date.
    pub fn resolved_date(&self) -> String {
        match &self.date {
            Some(date) => date.clone(),
            None => chrono::Local::now().format(DATE_FORMAT).to_string(),
        }
    }
}

pub(crate) fn write_header<W: Write>(w: &mut W, header: &HeaderOptions) -> io::Result<()> {
    writeln!(w, "$date")?;
    writeln!(w, "   {}", header.resolved_date())?;
    writeln!(w, "$end")?;
    writeln!(w, "$version")?;
    writeln!(w, "   {}", header.version)?;
    writeln!(w, "$end")?;
    writeln!(w, "$timescale {} $end", header.timescale)?;
    Ok(())
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

pub(crate) fn write_scope<W: Write>(w: &mut W, depth: usize, name: &str) -> io::Result<()> {
    writeln!(w, "{}$scope module {name} $end", indent(depth))
}

pub(crate) fn write_upscope<W: Write>(w: &mut W, depth: usize) -> io::Result<()> {
    writeln!(w, "{}$upscope $end", indent(depth))
}

pub(crate) fn write_var<W: Write>(
    w: &mut W,
    depth: usize,
    width: u32,
    symbol: &str,
    name: &str,
) -> io::Result<()> {
    writeln!(w, "{}$var wire {width} {symbol} {name} $end", indent(depth))
}

pub(crate) fn write_enddefinitions<W: Write>(w: &mut W) -> io::Result<()> {
    writeln!(w, "$enddefinitions $end")
}

pub(crate) fn write_time<W: Write>(w: &mut W, time: u64) -> io::Result<()> {
    writeln!(w, "#{time}")
}

/// Writes an already formatted value. Scalars have no separator before the code.
pub(crate) fn write_change<W: Write>(
    w: &mut W,
    formatted: &str,
    width: u32,
    symbol: &str,
) -> io::Result<()> {
    if width == 1 {
        writeln!(w, "{formatted}{symbol}")
    } else {
        writeln!(w, "{formatted} {symbol}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn scalar_values() {
        assert_eq!(format_value(0, 1).unwrap(), "0");
        assert_eq!(format_value(1, 1).unwrap(), "1");
    }

    #[test]
    fn vector_padded_to_declared_width() {
        assert_eq!(format_value(85, 8).unwrap(), "b01010101");
        assert_eq!(format_value(0, 8).unwrap(), "b00000000");
        assert_eq!(format_value(0b1010, 4).unwrap(), "b1010");
    }

    #[test]
    fn widest_supported_vector() {
        let v = format_value((1 << 62) | 1, 63).unwrap();
        assert_eq!(v.len(), 64);
        assert!(v.starts_with("b1"));
        assert!(v.ends_with('1'));
    }

    #[test]
    fn width_limits() {
        assert_eq!(check_width(0), Err(FormatError::ZeroWidth));
        assert_eq!(check_width(64), Err(FormatError::WidthTooLarge(64)));
        assert!(check_width(63).is_ok());
        assert_eq!(format_value(1, 64), Err(FormatError::WidthTooLarge(64)));
    }

    #[test]
    fn value_too_wide_rejected() {
        assert_eq!(
            format_value(256, 8),
            Err(FormatError::ValueTooWide {
                value: 256,
                width: 8
            })
        );
        assert_eq!(
            format_value(2, 1),
            Err(FormatError::ValueTooWide { value: 2, width: 1 })
        );
    }

    #[test]
    fn fits_boundaries() {
        assert!(fits(255, 8));
        assert!(!fits(256, 8));
        assert!(fits(u64::MAX >> 1, 63));
    }

    #[test]
    fn header_layout() {
        let header = HeaderOptions {
            date: Some("Aug 27, 2021".into()),
            version: "VCD generator tool version V0.1".into(),
            timescale: Timescale::default(),
        };
        let mut buf = Vec::new();
        write_header(&mut buf, &header).unwrap();
        assert_eq!(
            text(buf),
            "$date\n   Aug 27, 2021\n$end\n$version\n   VCD generator tool version V0.1\n$end\n$timescale 1ps $end\n"
        );
    }

    #[test]
    fn default_header_uses_current_date() {
        let header = HeaderOptions::default();
        assert!(header.version.starts_with("vcdgen "));
        assert!(!header.resolved_date().is_empty());
    }

    #[test]
    fn declaration_lines_indent_by_depth() {
        let mut buf = Vec::new();
        write_scope(&mut buf, 1, "sub").unwrap();
        write_var(&mut buf, 2, 8, "!", "data").unwrap();
        write_upscope(&mut buf, 1).unwrap();
        assert_eq!(
            text(buf),
            "  $scope module sub $end\n    $var wire 8 ! data $end\n  $upscope $end\n"
        );
    }

    #[test]
    fn change_separator_depends_on_width() {
        let mut buf = Vec::new();
        write_change(&mut buf, "1", 1, "@").unwrap();
        write_change(&mut buf, "b0101", 4, "#").unwrap();
        assert_eq!(text(buf), "1@\nb0101 #\n");
    }
}
