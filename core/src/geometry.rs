//! Rectangles and CSS-style margins used for visibility tests.
//!
//! Coordinates follow the usual screen convention: `x` grows to the right and `y` grows downward,
//! and all values are in CSS pixels.

use crate::error::MarginParseError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Axis-aligned rectangle, given by its top-left corner and size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Area of the rectangle. Degenerate rectangles (zero or negative size) have zero area.
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Grows (positive lengths) or shrinks (negative lengths) each side of the rectangle by the
    /// corresponding side of `margin`.
    ///
    /// Percentages resolve against this rectangle's height for `top` and `bottom`, and against its
    /// width for `left` and `right`. A margin that shrinks the rectangle past zero size produces a
    /// rectangle that intersects nothing.
    pub fn expand_by(&self, margin: &Margin) -> Rect {
        let top = margin.top.resolve(self.height);
        let right = margin.right.resolve(self.width);
        let bottom = margin.bottom.resolve(self.height);
        let left = margin.left.resolve(self.width);
        Rect {
            x: self.x - left,
            y: self.y - top,
            width: self.width + left + right,
            height: self.height + top + bottom,
        }
    }

    /// Computes the overlapping region of two rectangles.
    ///
    /// Rectangles that only share an edge still intersect, with a zero-area result. Returns
    /// [`None`] when they are disjoint or either one has negative size.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if self.width < 0.0 || self.height < 0.0 || other.width < 0.0 || other.height < 0.0 {
            return None;
        }
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// A single CSS length as accepted by an intersection root margin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// Absolute length in pixels.
    Px(f32),
    /// Percentage of the relevant root dimension, e.g. `50.0` for `50%`.
    Percent(f32),
}

impl Length {
    /// Converts to pixels, resolving percentages against `basis`.
    pub fn resolve(&self, basis: f32) -> f32 {
        match self {
            Length::Px(px) => *px,
            Length::Percent(percent) => basis * percent / 100.0,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Length::Px(0.0)
    }
}

impl FromStr for Length {
    type Err = MarginParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MarginParseError::InvalidLength(s.to_string());
        if let Some(number) = s.strip_suffix("px") {
            parse_finite(number).map(Length::Px).ok_or_else(invalid)
        } else if let Some(number) = s.strip_suffix('%') {
            parse_finite(number).map(Length::Percent).ok_or_else(invalid)
        } else {
            // Unitless lengths are only valid for zero, same as CSS.
            match parse_finite(s) {
                Some(value) if value == 0.0 => Ok(Length::Px(0.0)),
                _ => Err(invalid()),
            }
        }
    }
}

// `f32::from_str` also accepts "NaN" and "inf", which no CSS length can be.
fn parse_finite(number: &str) -> Option<f32> {
    number.parse::<f32>().ok().filter(|value| value.is_finite())
}

impl Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(px) => write!(f, "{px}px"),
            Length::Percent(percent) => write!(f, "{percent}%"),
        }
    }
}

/// Signed offsets applied to each side of an observation root, in CSS shorthand order.
///
/// Parsed from the same syntax as CSS `margin`: one to four lengths, interpreted as
/// `all`, `vertical horizontal`, `top horizontal bottom` or `top right bottom left`.
///
/// ```
/// use vitrine_core::geometry::{Length, Margin};
///
/// let margin: Margin = "0px 0px -100px 0px".parse().unwrap();
/// assert_eq!(margin.bottom, Length::Px(-100.0));
/// assert_eq!(margin.to_string(), "0px 0px -100px 0px");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Margin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl Margin {
    pub fn new(top: Length, right: Length, bottom: Length, left: Length) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Margin that leaves the root unchanged.
    pub fn zero() -> Self {
        Self::default()
    }
}

impl FromStr for Margin {
    type Err = MarginParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lengths = s
            .split_whitespace()
            .map(Length::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        match lengths[..] {
            [] => Err(MarginParseError::Empty),
            [all] => Ok(Margin::new(all, all, all, all)),
            [vertical, horizontal] => Ok(Margin::new(vertical, horizontal, vertical, horizontal)),
            [top, horizontal, bottom] => Ok(Margin::new(top, horizontal, bottom, horizontal)),
            [top, right, bottom, left] => Ok(Margin::new(top, right, bottom, left)),
            _ => Err(MarginParseError::TooManyValues(lengths.len())),
        }
    }
}

impl TryFrom<String> for Margin {
    type Error = MarginParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Margin> for String {
    fn from(margin: Margin) -> Self {
        margin.to_string()
    }
}

impl Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Length::{Percent, Px};

    #[test]
    fn parses_single_value_for_all_sides() {
        let margin: Margin = "10px".parse().unwrap();

        assert_eq!(margin, Margin::new(Px(10.0), Px(10.0), Px(10.0), Px(10.0)));
    }

    #[test]
    fn parses_shorthand_forms() {
        let two: Margin = "5px 10%".parse().unwrap();
        let three: Margin = "1px 2px 3px".parse().unwrap();
        let four: Margin = "0 1px -2px 3%".parse().unwrap();

        assert_eq!(two, Margin::new(Px(5.0), Percent(10.0), Px(5.0), Percent(10.0)));
        assert_eq!(three, Margin::new(Px(1.0), Px(2.0), Px(3.0), Px(2.0)));
        assert_eq!(four, Margin::new(Px(0.0), Px(1.0), Px(-2.0), Percent(3.0)));
    }

    #[test]
    fn rejects_non_finite_lengths() {
        for input in ["NaNpx", "infpx", "-infpx", "NaN%", "inf%", "NaN", "0px infinity%"] {
            let result = input.parse::<Margin>();

            assert!(
                matches!(result, Err(MarginParseError::InvalidLength(_))),
                "{input} parsed as {result:?}"
            );
        }
    }

    #[test]
    fn rejects_malformed_margins() {
        assert_eq!("".parse::<Margin>(), Err(MarginParseError::Empty));
        assert_eq!("   ".parse::<Margin>(), Err(MarginParseError::Empty));
        assert_eq!(
            "1px 2px 3px 4px 5px".parse::<Margin>(),
            Err(MarginParseError::TooManyValues(5))
        );
        assert_eq!(
            "10em".parse::<Margin>(),
            Err(MarginParseError::InvalidLength("10em".to_string()))
        );
        assert_eq!(
            "5".parse::<Margin>(),
            Err(MarginParseError::InvalidLength("5".to_string()))
        );
    }

    #[test]
    fn negative_margin_shrinks_root() {
        let root = Rect::new(0.0, 0.0, 800.0, 600.0);
        let margin: Margin = "0px 0px -100px 0px".parse().unwrap();

        assert_eq!(root.expand_by(&margin), Rect::new(0.0, 0.0, 800.0, 500.0));
    }

    #[test]
    fn percentage_margin_resolves_against_root_axis() {
        let root = Rect::new(0.0, 0.0, 200.0, 100.0);
        let margin: Margin = "10% 50%".parse().unwrap();

        assert_eq!(root.expand_by(&margin), Rect::new(-100.0, -10.0, 400.0, 120.0));
    }

    #[test]
    fn intersection_of_overlapping_rects() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 75.0, 100.0, 100.0);

        assert_eq!(a.intersection(&b), Some(Rect::new(50.0, 75.0, 50.0, 25.0)));
        assert_eq!(b.intersection(&a), Some(Rect::new(50.0, 75.0, 50.0, 25.0)));
    }

    #[test]
    fn edge_adjacent_rects_intersect_with_zero_area() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(0.0, 100.0, 100.0, 50.0);

        let overlap = a.intersection(&b).unwrap();
        assert_eq!(overlap.area(), 0.0);
    }

    #[test]
    fn disjoint_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(0.0, 100.5, 100.0, 50.0);

        assert_eq!(a.intersection(&b), None);
    }
}
