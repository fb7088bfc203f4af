//! The view a custom renderer gets of the engine.
//!
//! [`State`] is the whole capability surface: write bytes, read width,
//! precision and flags. A renderer cannot change options, see other
//! arguments, or read back what has been written.

use std::io;

use crate::buffer::Buffer;
use crate::options::OptionSet;

/// Printer state handed to [`FullFormat::format`](crate::FullFormat::format).
///
/// Output goes through [`io::Write`], so `write!(f, ...)` works directly.
pub trait State: io::Write {
    /// Width, if one was given.
    fn width(&self) -> Option<usize>;

    /// Precision, if one was given.
    fn precision(&self) -> Option<usize>;

    /// Whether flag `c` (one of ` +-#0`) is set.
    fn flag(&self, c: char) -> bool;
}

/// A [`State`] scoped to one verb occurrence.
///
/// Holds its own copy of the options, so nothing a nested formatting call
/// does can change what this context reports.
pub struct Context<'a> {
    buf: &'a mut Buffer,
    options: OptionSet,
}

impl<'a> Context<'a> {
    pub(crate) fn new(buf: &'a mut Buffer, options: OptionSet) -> Self {
        Self { buf, options }
    }
}

impl io::Write for Context<'_> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.write(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl State for Context<'_> {
    fn width(&self) -> Option<usize> {
        self.options.width()
    }

    fn precision(&self) -> Option<usize> {
        self.options.precision()
    }

    fn flag(&self, c: char) -> bool {
        self.options.flag(c)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::options::Flags;

    #[test]
    fn writes_pass_through_to_buffer() {
        let mut buf = Buffer::new();
        buf.write_str("<");
        {
            let mut ctx = Context::new(&mut buf, OptionSet::default());
            assert_eq!(ctx.write(b"abc").unwrap(), 3);
            write!(ctx, "{}", 42).unwrap();
        }
        assert_eq!(buf.as_bytes(), b"<abc42");
    }

    #[test]
    fn reports_options() {
        let mut buf = Buffer::new();
        let flags = Flags::parse("-#").unwrap();
        let ctx = Context::new(&mut buf, OptionSet::new(flags, Some(7), None));
        assert_eq!(ctx.width(), Some(7));
        assert_eq!(ctx.precision(), None);
        assert!(ctx.flag('-'));
        assert!(ctx.flag('#'));
        assert!(!ctx.flag('+'));
    }
}
