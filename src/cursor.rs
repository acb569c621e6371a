use super::*;
use std::io::{self, ErrorKind, Read};

/// Forward-only reader that knows how far into the stream it is.
pub struct DataCursor<R> {
    reader: R,
    position: u64,
}

impl<R: Read> DataCursor<R> {
    pub fn new(reader: R) -> Self {
        Self::with_position(reader, 0)
    }

    /// Wraps a reader that has already consumed `position` bytes.
    pub fn with_position(reader: R, position: u64) -> Self {
        Self { reader, position }
    }

    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn truncated(&self, field: &'static str) -> Error {
        Error::TruncatedStream {
            field,
            offset: self.position,
        }
    }

    pub fn read_bin<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], Error> {
        let mut buffer = [0u8; N];
        match self.reader.read_exact(&mut buffer) {
            Ok(()) => {
                self.position += N as u64;
                Ok(buffer)
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(self.truncated(field)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, Error> {
        Ok(self.read_bin::<1>(field)?[0])
    }

    pub fn read_i8(&mut self, field: &'static str) -> Result<i8, Error> {
        Ok(i8::from_le_bytes(self.read_bin::<1>(field)?))
    }

    pub fn read_u16(&mut self, field: &'static str) -> Result<u16, Error> {
        Ok(u16::from_le_bytes(self.read_bin::<2>(field)?))
    }

    pub fn read_i16(&mut self, field: &'static str) -> Result<i16, Error> {
        Ok(i16::from_le_bytes(self.read_bin::<2>(field)?))
    }

    pub fn read_u32(&mut self, field: &'static str) -> Result<u32, Error> {
        Ok(u32::from_le_bytes(self.read_bin::<4>(field)?))
    }

    pub fn read_i32(&mut self, field: &'static str) -> Result<i32, Error> {
        Ok(i32::from_le_bytes(self.read_bin::<4>(field)?))
    }

    pub fn read_f32(&mut self, field: &'static str) -> Result<f32, Error> {
        Ok(f32::from_le_bytes(self.read_bin::<4>(field)?))
    }

    fn read_vec<const N: usize>(&mut self, field: &'static str) -> Result<[f32; N], Error> {
        let mut buffer = [0.0f32; N];
        for v in buffer.iter_mut() {
            *v = self.read_f32(field)?;
        }
        Ok(buffer)
    }

    pub fn read_vec2(&mut self, field: &'static str) -> Result<[f32; 2], Error> {
        self.read_vec::<2>(field)
    }

    pub fn read_vec3(&mut self, field: &'static str) -> Result<[f32; 3], Error> {
        self.read_vec::<3>(field)
    }

    pub fn read_vec4(&mut self, field: &'static str) -> Result<[f32; 4], Error> {
        self.read_vec::<4>(field)
    }

    /// Reads a signed index. Narrow widths are sign-extended so that an
    /// all-ones pattern is always `-1`.
    pub fn read_index(&mut self, size: IndexSize, field: &'static str) -> Result<Index, Error> {
        let v = match size {
            IndexSize::Byte => self.read_i8(field)? as i32,
            IndexSize::Short => self.read_i16(field)? as i32,
            IndexSize::Int => self.read_i32(field)?,
        };
        Ok(Index(v))
    }

    /// Reads an `i32` element count, rejecting negative values.
    pub fn read_count(&mut self, field: &'static str) -> Result<usize, Error> {
        let offset = self.position;
        let value = self.read_i32(field)?;
        usize::try_from(value).map_err(|_| Error::NegativeLength {
            field,
            value,
            offset,
        })
    }

    fn read_bytes(&mut self, len: usize, field: &'static str) -> Result<Vec<u8>, Error> {
        // `take` keeps a corrupt length from reserving a huge buffer up front.
        let mut buffer = vec![];
        (&mut self.reader)
            .take(len as u64)
            .read_to_end(&mut buffer)?;
        if buffer.len() < len {
            return Err(self.truncated(field));
        }
        self.position += len as u64;
        Ok(buffer)
    }

    pub fn read_text(&mut self, encoding: Encoding, field: &'static str) -> Result<String, Error> {
        let len = self.read_count(field)?;
        if len == 0 {
            return Ok(String::new());
        }
        let offset = self.position;
        let buffer = self.read_bytes(len, field)?;
        let invalid = || Error::InvalidEncoding {
            encoding,
            field,
            offset,
        };
        match encoding {
            Encoding::Utf16 => {
                if len % 2 != 0 {
                    return Err(invalid());
                }
                let units = buffer
                    .chunks_exact(2)
                    .map(|c| u16::from_le_bytes([c[0], c[1]]))
                    .collect::<Vec<_>>();
                String::from_utf16(&units).map_err(|_| invalid())
            }
            Encoding::Utf8 => String::from_utf8(buffer).map_err(|_| invalid()),
        }
    }

    /// Discards `len` bytes.
    pub fn skip(&mut self, len: u64, field: &'static str) -> Result<(), Error> {
        let skipped = io::copy(&mut (&mut self.reader).take(len), &mut io::sink())?;
        if skipped < len {
            return Err(self.truncated(field));
        }
        self.position += len;
        Ok(())
    }

    /// Discards a length-prefixed text field without decoding it.
    pub fn skip_text(&mut self, field: &'static str) -> Result<(), Error> {
        let len = self.read_count(field)?;
        self.skip(len as u64, field)
    }
}
