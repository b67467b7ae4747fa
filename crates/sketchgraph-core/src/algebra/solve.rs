//! Dense 4×4 linear solve used for multivector inversion.

/// Pivots smaller than this are treated as zero.
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Solve `m · x = rhs` by Gaussian elimination with partial pivoting.
///
/// Returns `None` when the system is singular.
pub(crate) fn solve4(mut m: [[f64; 4]; 4], mut rhs: [f64; 4]) -> Option<[f64; 4]> {
    for col in 0..4 {
        // Partial pivot: bring the largest remaining entry of this column up.
        let mut pivot = col;
        for row in (col + 1)..4 {
            if m[row][col].abs() > m[pivot][col].abs() {
                pivot = row;
            }
        }
        if m[pivot][col].abs() < PIVOT_TOLERANCE {
            return None;
        }
        m.swap(col, pivot);
        rhs.swap(col, pivot);

        for row in (col + 1)..4 {
            let factor = m[row][col] / m[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..4 {
                m[row][k] -= factor * m[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut x = [0.0; 4];
    for row in (0..4).rev() {
        let mut sum = rhs[row];
        for k in (row + 1)..4 {
            sum -= m[row][k] * x[k];
        }
        x[row] = sum / m[row][row];
    }
    Some(x)
}
