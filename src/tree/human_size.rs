const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Renders a signed byte count with a scaled unit and two decimals,
/// e.g. `1536` becomes `"1.50 KB"`. Scaling caps at PB. A missing size
/// renders as `"N/A"`.
pub fn human_readable_size(size: Option<i64>) -> String {
    let Some(size) = size else {
        return "N/A".to_string();
    };

    let mut value = size as f64;
    let mut unit = 0;
    while value.abs() >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}
