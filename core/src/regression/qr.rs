//! Householder QR least squares for small, fixed-width design matrices.

/// Columns whose remaining norm falls below this fraction of their original
/// norm are treated as linearly dependent on the columns before them.
const RANK_TOLERANCE: f64 = 1e-10;

/// Solves `min ||X b - y||` for `b`.
///
/// Returns the index of the first rank-deficient column on failure.
pub(crate) fn least_squares<const P: usize>(
    rows: &[[f64; P]],
    y: &[f64],
) -> Result<[f64; P], usize> {
    debug_assert_eq!(rows.len(), y.len());

    let n = rows.len();
    let mut a: Vec<[f64; P]> = rows.to_vec();
    let mut b: Vec<f64> = y.to_vec();

    let mut original_norms = [0.0; P];
    for (j, norm) in original_norms.iter_mut().enumerate() {
        *norm = a.iter().map(|row| row[j] * row[j]).sum::<f64>().sqrt();
    }

    if n < P {
        return Err(n);
    }

    let mut v = vec![0.0; n];
    for k in 0..P {
        let norm = (k..n).map(|i| a[i][k] * a[i][k]).sum::<f64>().sqrt();
        if norm <= RANK_TOLERANCE * original_norms[k] || norm == 0.0 {
            return Err(k);
        }

        let alpha = if a[k][k] > 0.0 { -norm } else { norm };
        for i in k..n {
            v[i] = a[i][k];
        }
        v[k] -= alpha;
        let v_norm_sq: f64 = (k..n).map(|i| v[i] * v[i]).sum();

        for j in k..P {
            let dot: f64 = (k..n).map(|i| v[i] * a[i][j]).sum();
            let factor = 2.0 * dot / v_norm_sq;
            for i in k..n {
                a[i][j] -= factor * v[i];
            }
        }

        let dot: f64 = (k..n).map(|i| v[i] * b[i]).sum();
        let factor = 2.0 * dot / v_norm_sq;
        for i in k..n {
            b[i] -= factor * v[i];
        }
    }

    let mut solution = [0.0; P];
    for k in (0..P).rev() {
        let tail: f64 = (k + 1..P).map(|j| a[k][j] * solution[j]).sum();
        solution[k] = (b[k] - tail) / a[k][k];
    }
    Ok(solution)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
