// Byte builder for synthetic test streams.

use super::*;

#[derive(Default)]
pub(crate) struct Writer {
    pub(crate) data: Vec<u8>,
}

impl Writer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn u8(&mut self, v: u8) -> &mut Self {
        self.data.push(v);
        self
    }

    pub(crate) fn u16(&mut self, v: u16) -> &mut Self {
        self.data.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub(crate) fn i32(&mut self, v: i32) -> &mut Self {
        self.data.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub(crate) fn f32(&mut self, v: f32) -> &mut Self {
        self.data.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub(crate) fn vec<const N: usize>(&mut self, v: [f32; N]) -> &mut Self {
        for x in v {
            self.f32(x);
        }
        self
    }

    pub(crate) fn index(&mut self, size: IndexSize, v: i32) -> &mut Self {
        match size {
            IndexSize::Byte => self.data.extend_from_slice(&(v as i8).to_le_bytes()),
            IndexSize::Short => self.data.extend_from_slice(&(v as i16).to_le_bytes()),
            IndexSize::Int => self.data.extend_from_slice(&v.to_le_bytes()),
        }
        self
    }

    pub(crate) fn text(&mut self, encoding: Encoding, s: &str) -> &mut Self {
        match encoding {
            Encoding::Utf8 => {
                self.i32(s.len() as i32);
                self.data.extend_from_slice(s.as_bytes());
            }
            Encoding::Utf16 => {
                let units = s.encode_utf16().collect::<Vec<_>>();
                self.i32(units.len() as i32 * 2);
                for u in units {
                    self.u16(u);
                }
            }
        }
        self
    }

    pub(crate) fn bytes(&mut self, v: &[u8]) -> &mut Self {
        self.data.extend_from_slice(v);
        self
    }

    pub(crate) fn cursor(&self) -> DataCursor<std::io::Cursor<&[u8]>> {
        DataCursor::new(std::io::Cursor::new(&self.data[..]))
    }
}
