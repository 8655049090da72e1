use std::fmt;

/// Closed genomic or protein interval `[begin, end]` in 0-based coordinates.
///
/// Both ends are inclusive, so a single position has length 1. An interval
/// with `end < begin` cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    begin: u32,
    end: u32,
}

impl Interval {
    /// Construct `[begin, end]`, returning `None` when the range is inverted.
    pub fn new(begin: u32, end: u32) -> Option<Self> {
        (begin <= end).then_some(Self { begin, end })
    }

    /// Construct `[begin, end]` from signed arithmetic results.
    ///
    /// Returns `None` for negative bounds or inverted ranges.
    pub fn from_signed(begin: i64, end: i64) -> Option<Self> {
        let begin = u32::try_from(begin).ok()?;
        let end = u32::try_from(end).ok()?;
        Self::new(begin, end)
    }

    /// Interval covering a single position.
    pub fn point(position: u32) -> Self {
        Self {
            begin: position,
            end: position,
        }
    }

    /// First position (inclusive).
    pub fn begin(&self) -> u32 {
        self.begin
    }

    /// Last position (inclusive).
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of positions covered.
    pub fn len(&self) -> u32 {
        self.end - self.begin + 1
    }

    /// Always `false`; present for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `position` falls inside the interval.
    pub fn contains(&self, position: u32) -> bool {
        self.begin <= position && position <= self.end
    }

    /// Whether `other` lies entirely inside this interval.
    pub fn covers(&self, other: &Interval) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }

    /// Whether the two intervals share at least one position.
    pub fn intersects(&self, other: &Interval) -> bool {
        self.begin <= other.end && other.begin <= self.end
    }

    /// Shared sub-interval, if any.
    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        Interval::new(self.begin.max(other.begin), self.end.min(other.end))
    }

    /// Number of shared positions (0 when disjoint).
    pub fn overlap_len(&self, other: &Interval) -> u32 {
        self.intersection(other).map_or(0, |shared| shared.len())
    }

    /// Smallest interval covering both.
    pub fn span(&self, other: &Interval) -> Interval {
        Interval {
            begin: self.begin.min(other.begin),
            end: self.end.max(other.end),
        }
    }

    /// Copy with a new begin, `None` if that inverts the interval.
    pub fn with_begin(&self, begin: u32) -> Option<Interval> {
        Interval::new(begin, self.end)
    }

    /// Copy with a new end, `None` if that inverts the interval.
    pub fn with_end(&self, end: u32) -> Option<Interval> {
        Interval::new(self.begin, end)
    }

    /// Remove every position covered by `holes`, returning the remaining
    /// pieces in ascending order.
    ///
    /// `holes` must be sorted by begin and non-overlapping.
    pub fn subtract(&self, holes: &[Interval]) -> Vec<Interval> {
        let mut pieces = Vec::new();
        let mut cursor = Some(self.begin);

        for hole in holes.iter().filter(|hole| hole.intersects(self)) {
            if let Some(start) = cursor {
                if hole.begin > start {
                    pieces.push(Interval {
                        begin: start,
                        end: hole.begin - 1,
                    });
                }
            }
            cursor = hole.end.checked_add(1).filter(|next| *next <= self.end);
        }

        if let Some(start) = cursor {
            pieces.push(Interval {
                begin: start,
                end: self.end,
            });
        }
        pieces
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.begin, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(begin: u32, end: u32) -> Interval {
        Interval::new(begin, end).unwrap()
    }

    #[test]
    fn inverted_interval_is_rejected() {
        assert!(Interval::new(5, 4).is_none());
        assert!(Interval::from_signed(-1, 4).is_none());
        assert_eq!(iv(4, 4).len(), 1);
    }

    #[test]
    fn overlap_counts_inclusive_positions() {
        // 330..=360 shares 31 positions with 180..=360.
        assert_eq!(iv(180, 360).overlap_len(&iv(330, 500)), 31);
        assert_eq!(iv(195, 330).overlap_len(&iv(330, 500)), 1);
        assert_eq!(iv(0, 100).overlap_len(&iv(121, 150)), 0);
    }

    #[test]
    fn subtract_cuts_around_holes() {
        let exon = iv(771, 7484);
        let holes = [iv(1401, 1555), iv(2939, 3011), iv(4551, 4905)];
        assert_eq!(
            exon.subtract(&holes),
            vec![iv(771, 1400), iv(1556, 2938), iv(3012, 4550), iv(4906, 7484)]
        );
    }

    #[test]
    fn subtract_handles_holes_at_the_edges() {
        let exon = iv(10, 20);
        assert_eq!(exon.subtract(&[iv(5, 12)]), vec![iv(13, 20)]);
        assert_eq!(exon.subtract(&[iv(18, 30)]), vec![iv(10, 17)]);
        assert!(exon.subtract(&[iv(0, 40)]).is_empty());
        assert_eq!(exon.subtract(&[iv(30, 40)]), vec![exon]);
    }
}
