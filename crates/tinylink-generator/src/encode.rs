use tinylink_core::CodeFormat;

/// Renders `value` as exactly `format.length()` symbols of `format.alphabet()`,
/// least significant digit first.
///
/// Bits above `alphabet.len() ^ length` are discarded, which is what a
/// fixed-length code wants.
pub fn encode(mut value: u128, format: &CodeFormat) -> String {
    let alphabet = format.alphabet();
    let base = alphabet.len() as u128;

    (0..format.length())
        .map(|_| {
            let index = (value % base) as usize;
            value /= base;
            alphabet.symbol(index)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinylink_core::Alphabet;

    #[test]
    fn zero_pads_with_first_symbol() {
        let format = CodeFormat::default();
        assert_eq!(encode(0, &format), "0000000");
    }

    #[test]
    fn least_significant_digit_first() {
        let format = CodeFormat::default();
        // 62 = "10" in base62, emitted as "01" followed by padding.
        assert_eq!(encode(62, &format), "0100000");
        assert_eq!(encode(61, &format), "z000000");
    }

    #[test]
    fn always_emits_configured_length() {
        let format = CodeFormat::new(Alphabet::base62(), 12).unwrap();
        assert_eq!(encode(u128::MAX, &format).len(), 12);
    }

    #[test]
    fn binary_alphabet() {
        let format = CodeFormat::new(Alphabet::new("01").unwrap(), 4).unwrap();
        assert_eq!(encode(0b0110, &format), "0110");
        assert_eq!(encode(0b0001, &format), "1000");
    }
}
