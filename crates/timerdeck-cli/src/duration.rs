//! Human-friendly duration parsing and formatting.

/// Parse `90s`, `25m`, `1h30m`, `1m30s` or a bare millisecond count.
pub fn parse_duration(input: &str) -> Result<u64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty duration".into());
    }
    if let Ok(ms) = input.parse::<u64>() {
        return Ok(ms);
    }

    let mut total_ms: u64 = 0;
    let mut digits = String::new();
    for c in input.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let unit_ms = match c {
            'h' => 3_600_000,
            'm' => 60_000,
            's' => 1_000,
            _ => return Err(format!("invalid unit '{c}' in '{input}'")),
        };
        let value: u64 = digits
            .parse()
            .map_err(|_| format!("missing number before '{c}' in '{input}'"))?;
        total_ms = total_ms.saturating_add(value.saturating_mul(unit_ms));
        digits.clear();
    }
    if !digits.is_empty() {
        return Err(format!("missing unit after '{digits}' in '{input}'"));
    }
    Ok(total_ms)
}

/// `mm:ss`, or `h:mm:ss` from one hour up.
pub fn format_ms(ms: u64) -> String {
    let total_secs = ms / 1_000;
    let (h, m, s) = (total_secs / 3_600, (total_secs % 3_600) / 60, total_secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}
