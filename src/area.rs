use crate::utils;
use std::fmt;
use std::str::FromStr;

/// A type for the triangle area functions. Returns None for a degenerate
/// triangle.
pub type AreaFunction = fn([f64; 3], [f64; 3], [f64; 3]) -> Option<f64>;

/// Shortest side accepted by the Heron and trigonometric methods.
pub const MIN_SIDE: f64 = 1E-4;
/// Smallest sin^2 of the enclosed angle accepted by the trigonometric method.
pub const MIN_SIN_SQUARED: f64 = 1E-7;

/// Indicates which formula to compute the area of a triangle with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AreaMethod {
    /// Kahan's rearrangement of Heron's formula, stable for needles.
    Kahan,
    /// Heron's formula from the semi-perimeter.
    Heron,
    /// Half the product of two sides and the sine of the enclosed angle.
    Trigonometric,
}

impl AreaMethod {
    /// The function implementing this method.
    pub fn function(&self) -> AreaFunction {
        match self {
            Self::Kahan => kahan,
            Self::Heron => heron,
            Self::Trigonometric => trigonometric,
        }
    }

    /// Computes the area of the triangle p1, p2, p3.
    pub fn area(&self, p1: [f64; 3], p2: [f64; 3], p3: [f64; 3]) -> Option<f64> {
        (self.function())(p1, p2, p3)
    }
}

impl Default for AreaMethod {
    fn default() -> Self {
        Self::Kahan
    }
}

impl fmt::Display for AreaMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Kahan => "kahan",
            Self::Heron => "heron",
            Self::Trigonometric => "trigonometric",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for AreaMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kahan" => Ok(Self::Kahan),
            "heron" => Ok(Self::Heron),
            "trigonometric" => Ok(Self::Trigonometric),
            _ => Err(format!("Unknown area method \"{}\".", s)),
        }
    }
}

/// Side lengths of the triangle sorted so that a >= b >= c.
fn sorted_sides(p1: [f64; 3], p2: [f64; 3], p3: [f64; 3]) -> [f64; 3] {
    let mut sides = [utils::distance(p2, p3),
                     utils::distance(p1, p3),
                     utils::distance(p1, p2)];
    sides.sort_unstable_by(|x, y| y.total_cmp(x));
    sides
}

/// Area by Kahan's formula.
///
/// With the sides ordered a >= b >= c the triangle is impossible when
/// c - (a - b) < 0, otherwise
/// area = 0.25 * sqrt((a + (b + c))(c - (a - b))(c + (a - b))(a + (b - c))).
/// The brackets must not be rearranged.
pub fn kahan(p1: [f64; 3], p2: [f64; 3], p3: [f64; 3]) -> Option<f64> {
    let [a, b, c] = sorted_sides(p1, p2, p3);
    if c - (a - b) < 0.0 {
        return None;
    }
    let product = (a + (b + c)) * (c - (a - b)) * (c + (a - b)) * (a + (b - c));
    Some(0.25 * product.sqrt())
}

/// Area by Heron's formula, rejecting any side not longer than [`MIN_SIDE`].
pub fn heron(p1: [f64; 3], p2: [f64; 3], p3: [f64; 3]) -> Option<f64> {
    let [a, b, c] = sorted_sides(p1, p2, p3);
    if c <= MIN_SIDE {
        return None;
    }
    let s = (a + b + c) / 2.0;
    let product = s * (s - a) * (s - b) * (s - c);
    // rounding can push a flat triangle just below zero
    if product < 0.0 {
        return None;
    }
    Some(product.sqrt())
}

/// Area from two edge vectors leaving p1 and the sine of the angle between
/// them. Rejects short sides and near collinear corners.
pub fn trigonometric(p1: [f64; 3], p2: [f64; 3], p3: [f64; 3]) -> Option<f64> {
    let v1 = utils::subtract(p2, p1);
    let v2 = utils::subtract(p3, p1);
    let v3 = utils::subtract(p3, p2);
    let (l1, l2, l3) = (utils::norm(v1), utils::norm(v2), utils::norm(v3));
    if l1 <= MIN_SIDE || l2 <= MIN_SIDE || l3 <= MIN_SIDE {
        return None;
    }
    let cos = utils::vdot(v1, v2) / (l1 * l2);
    let pre_sin = 1.0 - cos.powi(2).min(1.0);
    if pre_sin < MIN_SIN_SQUARED {
        return None;
    }
    Some(0.5 * l1 * l2 * pre_sin.sqrt())
}
