/// Binary size prefixes, largest first so the loop picks the widest
/// unit that fits.
const UNITS: &[(u64, &str)] = &[
    (1 << 50, "PiB"),
    (1 << 40, "TiB"),
    (1 << 30, "GiB"),
    (1 << 20, "MiB"),
    (1 << 10, "KiB"),
];

/// Render a byte count with one decimal of the largest binary unit it
/// reaches, or as a plain `N bytes` below one KiB.
pub fn fmt_bytes(num_bytes: u64) -> String {
    for &(size, name) in UNITS {
        if num_bytes >= size {
            return format!("{:.1} {}", num_bytes as f64 / size as f64, name);
        }
    }
    format!("{} bytes", num_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_counts_stay_plain_bytes() {
        assert_eq!(fmt_bytes(0), "0 bytes");
        assert_eq!(fmt_bytes(10), "10 bytes");
        assert_eq!(fmt_bytes(1023), "1023 bytes");
    }

    #[test]
    fn test_exact_unit_boundaries() {
        assert_eq!(fmt_bytes(1024), "1.0 KiB");
        assert_eq!(fmt_bytes(1048576), "1.0 MiB");
        assert_eq!(fmt_bytes(1 << 30), "1.0 GiB");
        assert_eq!(fmt_bytes(1 << 40), "1.0 TiB");
        assert_eq!(fmt_bytes(1 << 50), "1.0 PiB");
    }

    #[test]
    fn test_fractional_values_keep_one_decimal() {
        assert_eq!(fmt_bytes(1572864), "1.5 MiB");
        assert_eq!(fmt_bytes(1536), "1.5 KiB");
    }

    #[test]
    fn test_value_far_above_the_largest_unit() {
        assert_eq!(fmt_bytes(3 << 50), "3.0 PiB");
    }
}
