//! Number formatting helpers shared by the converter and the reporter.

/// Format file size in human-readable format
///
/// # Arguments
/// * `bytes` - Size in bytes
///
/// # Returns
/// * Human-readable size string (e.g., "1.2 MB", "512 B")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Format an integer with `,` thousands separators, e.g. `10,456,789`.
pub fn format_with_separators(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Size change from `original_size` to `converted_size` as a percentage,
/// rounded to one decimal place. Negative means the file shrank.
///
/// # Returns
/// * `None` when `original_size` is zero
pub fn percent_change(original_size: u64, converted_size: u64) -> Option<f64> {
    if original_size == 0 {
        return None;
    }
    let change =
        (converted_size as f64 - original_size as f64) / original_size as f64 * 100.0;
    Some((change * 10.0).round() / 10.0)
}

/// Render a percentage change with an explicit sign, e.g. `-42.5%`.
pub fn format_percent_change(original_size: u64, converted_size: u64) -> String {
    match percent_change(original_size, converted_size) {
        Some(pct) => format!("{:+.1}%", pct),
        None => "n/a".to_string(),
    }
}
