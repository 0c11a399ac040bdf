use crate::LeaderboardEntry;

const INITIALS_LEN: usize = 3;

pub(crate) fn letters_upper(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Uppercases `raw`, drops everything but ASCII letters and keeps the first three.
#[must_use]
pub fn sanitize_initials(raw: &str) -> String {
    letters_upper(raw).chars().take(INITIALS_LEN).collect()
}

/// Whether `initials` is exactly three uppercase ASCII letters.
#[must_use]
pub fn is_valid_initials(initials: &str) -> bool {
    initials.len() == INITIALS_LEN && initials.bytes().all(|b| b.is_ascii_uppercase())
}

/// Short score label: `999`, `1.2K`, `12K`, `3.4M`.
#[must_use]
pub fn format_compact(value: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1_000_000_000, "B"), (1_000_000, "M"), (1_000, "K")];

    for (scale, suffix) in UNITS {
        if value >= scale {
            let scaled = value as f64 / scale as f64;
            return if scaled >= 10.0 {
                format!("{}{suffix}", scaled.floor() as u64)
            } else {
                let tenths = (scaled * 10.0).floor() / 10.0;
                let text = format!("{tenths:.1}");
                format!("{}{suffix}", text.trim_end_matches(".0"))
            };
        }
    }
    value.to_string()
}

/// One board row, e.g. ` 1. ABC   12K`.
#[must_use]
pub fn format_entry_line(rank: usize, entry: &LeaderboardEntry) -> String {
    format!("{rank:>2}. {:<3} {:>5}", entry.player, format_compact(entry.total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_initials_validate_only_when_three_letters_remain() {
        assert_eq!(sanitize_initials("a.b-c"), "ABC");
        assert!(is_valid_initials(&sanitize_initials("a.b-c")));
        assert_eq!(sanitize_initials("zoey"), "ZOE");
        assert_eq!(sanitize_initials("j1"), "J");
        assert!(!is_valid_initials(&sanitize_initials("j1")));
        assert!(!is_valid_initials(&sanitize_initials("42!")));
        assert!(!is_valid_initials("AB1"));
        assert!(!is_valid_initials("abc"));
        assert!(!is_valid_initials("ÄBC"));
    }

    #[test]
    fn compact_format_scales_and_truncates() {
        assert_eq!(format_compact(0), "0");
        assert_eq!(format_compact(999), "999");
        assert_eq!(format_compact(1_000), "1K");
        assert_eq!(format_compact(1_299), "1.2K");
        assert_eq!(format_compact(12_345), "12K");
        assert_eq!(format_compact(3_450_000), "3.4M");
        assert_eq!(format_compact(7_000_000_000), "7B");
    }

    #[test]
    fn entry_lines_align() {
        let entry = LeaderboardEntry {
            player: "ACE".to_owned(),
            total: 12_345,
            splits: [4_000, 4_000, 4_345],
        };
        assert_eq!(format_entry_line(1, &entry), " 1. ACE   12K");
    }
}
