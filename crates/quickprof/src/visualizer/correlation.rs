//! Pairwise Pearson correlation.

use crate::profiler::mean;

/// Correlation matrix of row-aligned columns.
///
/// Each pair uses only the rows where both values are present. A pair with
/// fewer than two such rows, or without spread, is NaN.
pub(crate) fn correlation_matrix(columns: &[Vec<Option<f64>>]) -> Vec<Vec<f64>> {
    let k = columns.len();
    let mut matrix = vec![vec![f64::NAN; k]; k];
    for i in 0..k {
        for j in i..k {
            let r = pearson(&columns[i], &columns[j]);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}

fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .unzip();
    if xs.len() < 2 {
        return f64::NAN;
    }

    let (mx, my) = (mean(&xs), mean(&ys));
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(&ys) {
        let (dx, dy) = (x - mx, y - my);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (cov / denom).clamp(-1.0, 1.0)
}

/// Diverging blue-grey-red colour for a correlation in [-1, 1].
pub(crate) fn coolwarm(r: f64) -> (u8, u8, u8) {
    const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

    let r = r.clamp(-1.0, 1.0);
    let (from, to, t) = if r < 0.0 {
        (COLD, NEUTRAL, r + 1.0)
    } else {
        (NEUTRAL, WARM, r)
    };
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    (lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().map(|v| Some(*v)).collect()
    }

    #[test]
    fn test_perfect_correlations() {
        let a = col(&[1.0, 2.0, 3.0, 4.0]);
        let b = col(&[2.0, 4.0, 6.0, 8.0]);
        let c = col(&[4.0, 3.0, 2.0, 1.0]);
        let m = correlation_matrix(&[a, b, c]);

        assert!((m[0][0] - 1.0).abs() < 1e-12);
        assert!((m[0][1] - 1.0).abs() < 1e-12);
        assert!((m[0][2] + 1.0).abs() < 1e-12);
        assert_eq!(m[1][2], m[2][1]);
    }

    #[test]
    fn test_pairwise_complete_rows() {
        let a = vec![Some(1.0), Some(2.0), None, Some(4.0)];
        let b = vec![Some(1.0), Some(2.0), Some(100.0), Some(4.0)];
        let m = correlation_matrix(&[a, b]);
        assert!((m[0][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_undefined_correlation() {
        let constant = col(&[3.0, 3.0, 3.0]);
        let varying = col(&[1.0, 2.0, 3.0]);
        let m = correlation_matrix(&[constant, varying]);
        assert!(m[0][1].is_nan());
        assert!(m[0][0].is_nan());
        assert!((m[1][1] - 1.0).abs() < 1e-12);

        let sparse = vec![Some(1.0), None, None];
        let m = correlation_matrix(&[sparse, col(&[1.0, 2.0, 3.0])]);
        assert!(m[0][1].is_nan());
    }

    #[test]
    fn test_coolwarm_endpoints() {
        assert_eq!(coolwarm(-1.0), (59, 76, 192));
        assert_eq!(coolwarm(0.0), (221, 221, 221));
        assert_eq!(coolwarm(1.0), (180, 4, 38));
        assert_eq!(coolwarm(2.0), coolwarm(1.0));
    }
}
