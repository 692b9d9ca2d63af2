//! The three condition flags (`OF`, `SF`, `ZF`) and their packed `FR` form.

/// Overflow, sign and zero flags, updated after most arithmetic and comparison
/// instructions.
///
/// # Examples
/// ```
/// use comet2::Flags;
///
/// let mut flags = Flags::default();
/// flags.set(false, true, false);
/// assert_eq!(flags.packed(), 0b010);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    pub of: bool,
    pub sf: bool,
    pub zf: bool,
}

impl Flags {
    pub fn new() -> Flags {
        // COMET II powers up with ZF set, matching an initial accumulator value of zero.
        Flags {
            of: false,
            sf: false,
            zf: true,
        }
    }

    pub fn set(&mut self, of: bool, sf: bool, zf: bool) {
        self.of = of;
        self.sf = sf;
        self.zf = zf;
    }

    /// Packs the three flags into the low three bits of the `FR` status register,
    /// `FR = OF<<2 | SF<<1 | ZF`.
    pub fn packed(&self) -> u8 {
        ((self.of as u8) << 2) | ((self.sf as u8) << 1) | (self.zf as u8)
    }

    /// Derives `SF`/`ZF` from a 16-bit result and sets `OF` explicitly; used by
    /// instructions that never overflow (`LD`, `AND`, `OR`, `XOR`).
    pub fn from_result(result: u16, of: bool) -> Flags {
        Flags {
            of,
            sf: result & 0x8000 != 0,
            zf: result == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_in_of_sf_zf_order() {
        let mut flags = Flags::default();
        flags.set(true, true, true);
        assert_eq!(flags.packed(), 0b111);
        flags.set(true, false, false);
        assert_eq!(flags.packed(), 0b100);
    }

    #[test]
    fn from_result_reads_sign_and_zero_bits() {
        assert_eq!(Flags::from_result(0, false).zf, true);
        assert_eq!(Flags::from_result(0x8000, false).sf, true);
        assert_eq!(Flags::from_result(1, false).sf, false);
    }
}
