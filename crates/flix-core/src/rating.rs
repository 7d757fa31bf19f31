/// Five-star rendering of a 0–10 vote average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarRating {
    pub filled: u8,
    pub half: bool,
    pub empty: u8,
}

pub const STARS: u8 = 5;

impl StarRating {
    /// `filled = floor(v/10*5)`, half star when the remainder is at least 0.5.
    /// Out-of-range and NaN inputs clamp into 0..=10.
    pub fn from_average(value: f32) -> Self {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 10.0) };
        let rating = value / 10.0 * STARS as f32;
        let filled = rating.floor() as u8;
        let half = filled < STARS && rating.fract() >= 0.5;
        let empty = STARS - filled - u8::from(half);
        Self { filled, half, empty }
    }

    pub fn glyphs(&self) -> String {
        let mut out = String::with_capacity(STARS as usize * 3);
        out.extend(std::iter::repeat('★').take(self.filled as usize));
        if self.half {
            out.push('⯪');
        }
        out.extend(std::iter::repeat('☆').take(self.empty as usize));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        let r = StarRating::from_average(0.0);
        assert_eq!(r, StarRating { filled: 0, half: false, empty: 5 });
    }

    #[test]
    fn test_seven_and_a_half() {
        let r = StarRating::from_average(7.5);
        assert_eq!(r, StarRating { filled: 3, half: true, empty: 1 });
        assert_eq!(r.glyphs().chars().count(), 5);
    }

    #[test]
    fn test_ten() {
        let r = StarRating::from_average(10.0);
        assert_eq!(r, StarRating { filled: 5, half: false, empty: 0 });
        assert_eq!(r.glyphs(), "★★★★★");
    }

    #[test]
    fn test_below_half_has_no_half_star() {
        // 6.8 / 10 * 5 = 3.4
        let r = StarRating::from_average(6.8);
        assert_eq!(r, StarRating { filled: 3, half: false, empty: 2 });
    }

    #[test]
    fn test_total_over_odd_inputs() {
        for v in [-3.0, f32::NAN, 11.0, f32::INFINITY] {
            let r = StarRating::from_average(v);
            assert_eq!(r.filled + u8::from(r.half) + r.empty, STARS);
        }
    }
}
