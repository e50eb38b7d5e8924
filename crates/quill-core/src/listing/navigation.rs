//! Page links shown around the current page of a listing.

use serde::Serialize;

/// Widest window of page links, centred on the current page.
const WINDOW: i64 = 5;

/// Which page numbers to render as links, and whether to add shortcuts to the
/// first and last pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub numbers: Vec<u64>,
    pub display_first: bool,
    pub display_last: bool,
}

impl Navigation {
    /// Compute the links for `current` out of `num_pages`.
    ///
    /// Fewer than five pages are all shown. Otherwise a five-page window is
    /// centred on `current` and shifted back inside `1..=num_pages`; an edge of the
    /// window that is not the first (last) page is replaced by the first (last)
    /// page shortcut.
    pub fn around(current: u64, num_pages: u64) -> Self {
        let total = i64::try_from(num_pages.max(1)).unwrap_or(i64::MAX);
        if total < WINDOW {
            return Self {
                numbers: (1..=num_pages.max(1)).collect(),
                display_first: false,
                display_last: false,
            };
        }

        let current = i64::try_from(current).unwrap_or(total).clamp(1, total);
        let mut left = current - WINDOW / 2;
        let mut right = current + WINDOW / 2;
        if left < 1 {
            right += 1 - left;
            left = 1;
        } else if right > total {
            left -= right - total;
            right = total;
        }

        let display_first = left > 1;
        let display_last = right < total;
        let first_shown = if display_first { left + 1 } else { left };
        let last_shown = if display_last { right - 1 } else { right };

        Self {
            numbers: (first_shown..=last_shown).map(|n| n as u64).collect(),
            display_first,
            display_last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav(numbers: &[u64], display_first: bool, display_last: bool) -> Navigation {
        Navigation {
            numbers: numbers.to_vec(),
            display_first,
            display_last,
        }
    }

    #[test]
    fn test_single_page() {
        assert_eq!(Navigation::around(1, 1), nav(&[1], false, false));
        assert_eq!(Navigation::around(1, 0), nav(&[1], false, false));
    }

    #[test]
    fn test_four_pages_shows_everything() {
        for current in 1..=4 {
            assert_eq!(
                Navigation::around(current, 4),
                nav(&[1, 2, 3, 4], false, false)
            );
        }
    }

    #[test]
    fn test_five_pages_shows_everything() {
        for current in 1..=5 {
            assert_eq!(
                Navigation::around(current, 5),
                nav(&[1, 2, 3, 4, 5], false, false)
            );
        }
    }

    #[test]
    fn test_six_pages() {
        for current in 1..=3 {
            assert_eq!(
                Navigation::around(current, 6),
                nav(&[1, 2, 3, 4], false, true)
            );
        }
        for current in 4..=6 {
            assert_eq!(
                Navigation::around(current, 6),
                nav(&[3, 4, 5, 6], true, false)
            );
        }
    }

    #[test]
    fn test_ten_pages() {
        for current in 1..=3 {
            assert_eq!(
                Navigation::around(current, 10),
                nav(&[1, 2, 3, 4], false, true)
            );
        }
        for current in 4..=7 {
            assert_eq!(
                Navigation::around(current, 10),
                nav(&[current - 1, current, current + 1], true, true)
            );
        }
        for current in 8..=10 {
            assert_eq!(
                Navigation::around(current, 10),
                nav(&[7, 8, 9, 10], true, false)
            );
        }
    }

    #[test]
    fn test_numbers_stay_in_range() {
        for total in 1..=30 {
            for current in 1..=total {
                let window = Navigation::around(current, total);
                assert!(window.numbers.contains(&current), "{current}/{total}");
                assert!(window.numbers.iter().all(|&n| (1..=total).contains(&n)));
                assert!(window.numbers.windows(2).all(|w| w[1] == w[0] + 1));
            }
        }
    }
}
