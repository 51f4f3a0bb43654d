use serde::Serialize;
use skillkit_core::io::Artifact;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    // Widths count chars so CJK names don't throw off the padding math.
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  ").trim_end());

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}

/// Print each artifact under a `==> path <==` banner.
pub fn print_artifacts(artifacts: &[Artifact]) {
    for (i, a) in artifacts.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("==> {} <==", a.path);
        print!("{}", a.content);
        if !a.content.ends_with('\n') {
            println!();
        }
    }
}
