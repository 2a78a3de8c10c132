/// compute the vector pointing from a to b
pub fn subtract(b: [f64; 3], a: [f64; 3]) -> [f64; 3] {
    [b[0] - a[0], b[1] - a[1], b[2] - a[2]]
}

/// compute the dot product between two vectors
pub fn vdot(a: [f64; 3], b: [f64; 3]) -> f64 {
    let mut out = 0f64;
    for i in 0..3 {
        out += a[i] * b[i]
    }
    out
}

/// compute the norm of a vector
pub fn norm(a: [f64; 3]) -> f64 {
    a.iter().map(|a| a.powi(2)).sum::<f64>().powf(0.5)
}

/// compute the euclidean distance between two points
pub fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    norm(subtract(b, a))
}

/// arithmetic mean of three values
pub fn mean3(v: [f64; 3]) -> f64 {
    (v[0] + v[1] + v[2]) / 3.0
}

/// formats an integer number of hundredths as a two decimal string
///
/// Avoids a float round trip so that 0.40 is always written as "0.40".
pub fn hundredths(key: i32) -> String {
    let sign = if key < 0 { "-" } else { "" };
    let key = key.abs();
    format!("{}{}.{:02}", sign, key / 100, key % 100)
}

/// quantizes a value to hundredths, as its two decimal text reads
///
/// The key comes from the correctly rounded decimal form of the stored binary
/// value, so 0.415 (stored just below) gives 41. Scaling by 100 first would
/// round the product instead and give 42. Values that have no such form, or
/// overflow, map to `i32::MAX` which lies off every grid.
pub fn quantize(value: f64) -> i32 {
    format!("{:.2}", value).replace('.', "")
                           .parse::<i32>()
                           .unwrap_or(i32::MAX)
}
