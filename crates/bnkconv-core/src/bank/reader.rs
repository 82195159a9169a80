use super::error::BankError;

/// Bounds-checked view over a bank buffer or one of its regions.
///
/// Offsets passed to the read methods are relative to the start of the view.
/// Error lengths are reported relative to the whole buffer.
#[derive(Debug, Clone, Copy)]
pub struct BankReader<'a> {
    data: &'a [u8],
    base: usize,
    region: &'static str,
}

impl<'a> BankReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            base: 0,
            region: "header",
        }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), BankError> {
        if self.data.len() < needed {
            return Err(self.truncated(needed));
        }
        Ok(())
    }

    /// Narrow the view to `len` bytes starting at `start`.
    pub fn region(
        &self,
        start: usize,
        len: usize,
        region: &'static str,
    ) -> Result<BankReader<'a>, BankError> {
        let end = start
            .checked_add(len)
            .ok_or(BankError::OffsetOverflow { region })?;
        let data = self.data.get(start..end).ok_or(BankError::Truncated {
            region,
            needed: self.base.saturating_add(end),
            actual: self.base + self.data.len(),
        })?;
        Ok(BankReader {
            data,
            base: self.base + start,
            region,
        })
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, BankError> {
        self.data
            .get(offset)
            .copied()
            .ok_or_else(|| self.truncated(offset.saturating_add(1)))
    }

    pub fn read_u16_le(&self, range: std::ops::Range<usize>) -> Result<u16, BankError> {
        let bytes = self.read_slice(range)?;
        let bytes: [u8; 2] = bytes.try_into().map_err(|_| self.truncated(2))?;
        Ok(u16::from_le_bytes(bytes))
    }

    pub fn read_u32_le(&self, range: std::ops::Range<usize>) -> Result<u32, BankError> {
        let bytes = self.read_slice(range)?;
        let bytes: [u8; 4] = bytes.try_into().map_err(|_| self.truncated(4))?;
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], BankError> {
        self.data
            .get(range.clone())
            .ok_or_else(|| self.truncated(range.end))
    }

    /// Read a fixed-width name, one char per byte. Padding is kept.
    pub fn read_name(&self, range: std::ops::Range<usize>) -> Result<String, BankError> {
        let bytes = self.read_slice(range)?;
        Ok(bytes.iter().map(|&b| char::from(b)).collect())
    }

    /// OR together bytes shifted into their register positions.
    pub fn pack_fields(&self, fields: &[(usize, u32)]) -> Result<u32, BankError> {
        fields.iter().try_fold(0u32, |acc, &(offset, shift)| {
            Ok(acc | (u32::from(self.read_u8(offset)?) << shift))
        })
    }

    fn truncated(&self, needed: usize) -> BankError {
        BankError::Truncated {
            region: self.region,
            needed: self.base.saturating_add(needed),
            actual: self.base + self.data.len(),
        }
    }
}
