//! Text rendering of 2D matrices in the familiar nested-bracket layout.

use candle_core::Tensor;

use crate::error::SimResult;

const PRECISION: usize = 8;

/// Renders a rank-2 tensor as `[[a b]\n [c d]]`.
pub fn render_matrix(t: &Tensor) -> SimResult<String> {
    let rows = t.to_vec2::<f64>()?;
    Ok(render_rows(&rows))
}

pub fn render_rows(rows: &[Vec<f64>]) -> String {
    let max_abs = rows
        .iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold(0.0f64, |acc, v| acc.max(v.abs()));
    let scientific = max_abs != 0.0 && !(1e-4..1e8).contains(&max_abs);

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|v| {
                    if scientific {
                        format!("{:.*e}", PRECISION, v)
                    } else {
                        format!("{:.*}", PRECISION, v)
                    }
                })
                .collect()
        })
        .collect();
    let width = cells.iter().flatten().map(String::len).max().unwrap_or(0);

    let mut out = String::from("[");
    for (i, row) in cells.iter().enumerate() {
        if i > 0 {
            out.push_str("\n ");
        }
        out.push('[');
        let line: Vec<String> = row.iter().map(|c| format!("{c:>width$}")).collect();
        out.push_str(&line.join(" "));
        out.push(']');
    }
    out.push(']');
    out
}
