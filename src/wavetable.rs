//! Sinc pulse lookup table
//!
//! One complete beacon pulse as 8-bit PWM duty samples. The envelope is a
//! sampled sinc-like shape riding on the baseline duty level, peaking at
//! full scale in the middle of the table.
//!
//! The byte sequence is a wire-compatibility contract: receivers decode this
//! exact envelope, so the values must never be regenerated or "improved".

/// Number of samples in one beacon pulse.
pub const TABLE_LEN: usize = 158;

/// Sinc pulse amplitude table, played once per beacon cycle.
///
/// Read-only, `'static`, indexed by the playback index in `[0, TABLE_LEN)`.
#[rustfmt::skip]
pub static SINC_TABLE: [u8; TABLE_LEN] = [
     44,  44,  44,  44,  43,  43,  43,  43,  43,  43,  44,  44,  44,  44,
     44,  44,  44,  43,  43,  43,  43,  43,  43,  44,  45,  45,  45,  45,
     44,  43,  42,  41,  41,  41,  42,  44,  46,  47,  48,  47,  46,  44,
     41,  39,  37,  37,  39,  42,  47,  50,  53,  53,  51,  46,  40,  34,
     30,  28,  31,  37,  46,  55,  64,  67,  66,  57,  44,  27,  11,   1,
      0,  11,  35,  71, 115, 162, 205, 237, 255, 255, 237, 205, 162, 115,
     71,  35,  11,   0,   1,  11,  27,  44,  57,  66,  67,  64,  55,  46,
     37,  31,  28,  30,  34,  40,  46,  51,  53,  53,  50,  47,  42,  39,
     37,  37,  39,  41,  44,  46,  47,  48,  47,  46,  44,  42,  41,  41,
     41,  42,  43,  44,  45,  45,  45,  45,  44,  43,  43,  43,  43,  43,
     43,  44,  44,  44,  44,  44,  44,  44,  43,  43,  43,  43,  43,  43,
     44,  44,  44,  44,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_length() {
        assert_eq!(SINC_TABLE.len(), TABLE_LEN);
        assert_eq!(TABLE_LEN, 158);
    }

    #[test]
    fn test_table_peak_at_center() {
        // Main lobe peaks at full scale in the middle of the pulse
        assert_eq!(SINC_TABLE[78], 255);
        assert_eq!(SINC_TABLE[79], 255);
        let max = SINC_TABLE.iter().max().copied().unwrap();
        assert_eq!(max, 255);
    }

    #[test]
    fn test_table_symmetry() {
        // A sinc pulse is symmetric around its main lobe
        for i in 0..TABLE_LEN {
            assert_eq!(
                SINC_TABLE[i],
                SINC_TABLE[TABLE_LEN - 1 - i],
                "table not symmetric at index {}",
                i
            );
        }
    }

    #[test]
    fn test_table_endpoints_near_baseline() {
        // Pulse starts and ends within one LSB of the 43/255 baseline
        assert_eq!(SINC_TABLE[0], 44);
        assert_eq!(SINC_TABLE[TABLE_LEN - 1], 44);
    }
}
