//! Definition of the named sub-fields packed into a Fixed block.

/// Short names that mark structural bits rather than data.
const PLACEHOLDERS: [&str; 2] = ["FX", "spare"];

/// Where a [BitDef] sits inside its block.
///
/// Bits are numbered ASTERIX-style: bit 1 is the least-significant bit of the
/// block's last byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitSpan {
    /// A single flag bit.
    Bit(u16),
    /// Inclusive range, always stored with `high >= low`.
    Range { high: u16, low: u16 },
}

impl BitSpan {
    /// Builds a range from a `from`/`to` pair given in either order.
    pub fn range(from: u16, to: u16) -> Self {
        BitSpan::Range {
            high: from.max(to),
            low: from.min(to),
        }
    }

    pub fn high(&self) -> u16 {
        match *self {
            BitSpan::Bit(bit) => bit,
            BitSpan::Range { high, .. } => high,
        }
    }

    pub fn low(&self) -> u16 {
        match *self {
            BitSpan::Bit(bit) => bit,
            BitSpan::Range { low, .. } => low,
        }
    }

    /// Width in bits.
    pub fn width(&self) -> usize {
        (self.high() - self.low()) as usize + 1
    }

    pub fn overlaps(&self, other: &BitSpan) -> bool {
        self.low() <= other.high() && other.low() <= self.high()
    }
}

/// A single named sub-field of a Fixed block.
#[derive(Debug, Clone, PartialEq)]
pub struct BitDef {
    /// Short name used as the key in decoded mappings.
    pub name: String,
    pub span: BitSpan,
    /// If true, the raw value is sign-extended over the span width.
    pub signed: bool,
    /// Optional LSB weight: `decoded = raw * scale`.
    pub scale: Option<f64>,
}

impl BitDef {
    pub fn bit(name: impl Into<String>, bit: u16) -> Self {
        BitDef {
            name: name.into(),
            span: BitSpan::Bit(bit),
            signed: false,
            scale: None,
        }
    }

    pub fn range(name: impl Into<String>, from: u16, to: u16) -> Self {
        BitDef {
            name: name.into(),
            span: BitSpan::range(from, to),
            signed: false,
            scale: None,
        }
    }

    /// Marks the field as two's-complement signed.
    pub fn signed(mut self) -> Self {
        self.signed = true;
        self
    }

    /// Sets the LSB weight applied on decode and divided out on encode.
    pub fn scaled(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    /// True for `FX` and `spare` bits, which are decoded but never encoded from input.
    pub fn is_placeholder(&self) -> bool {
        PLACEHOLDERS.contains(&self.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_normalized() {
        assert_eq!(BitSpan::range(1, 12), BitSpan::range(12, 1));
        assert_eq!(BitSpan::range(1, 12).high(), 12);
        assert_eq!(BitSpan::range(1, 12).width(), 12);
    }

    #[test]
    fn test_single_bit_width() {
        assert_eq!(BitSpan::Bit(5).width(), 1);
    }

    #[test]
    fn test_overlaps() {
        assert!(BitSpan::range(8, 4).overlaps(&BitSpan::Bit(4)));
        assert!(!BitSpan::range(8, 5).overlaps(&BitSpan::range(4, 1)));
    }

    #[test]
    fn test_placeholder() {
        assert!(BitDef::bit("FX", 1).is_placeholder());
        assert!(BitDef::range("spare", 16, 13).is_placeholder());
        assert!(!BitDef::range("TrackN", 12, 1).is_placeholder());
    }

    #[test]
    fn test_builder() {
        let def = BitDef::range("FL", 16, 1).signed().scaled(0.25);
        assert!(def.signed);
        assert_eq!(def.scale, Some(0.25));
    }
}
