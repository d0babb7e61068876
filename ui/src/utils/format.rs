//! Token amount formatting and parsing
//!
//! Amounts travel as decimal strings (Subscan) or planck integers (chain).
//! Conversions are done on integers to avoid float rounding.

/// Parses a decimal token string ("12.5") into planck for `decimals`
pub fn parse_token_amount(value: &str, decimals: u8) -> Option<u128> {
    let value = value.trim();
    if value.is_empty() {
        return Some(0);
    }

    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (value, ""),
    };

    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let decimals = decimals as usize;
    let mut fraction = fraction.to_string();
    if fraction.len() > decimals {
        // Digits beyond the chain precision are dropped
        fraction.truncate(decimals);
    }
    while fraction.len() < decimals {
        fraction.push('0');
    }

    let digits = format!("{}{}", if whole.is_empty() { "0" } else { whole }, fraction);
    digits.parse::<u128>().ok()
}

/// Formats planck as a trimmed decimal string ("12.5")
pub fn format_token_amount(planck: u128, decimals: u8) -> String {
    let divisor = 10u128.pow(decimals as u32);
    let whole = planck / divisor;
    let fraction = planck % divisor;

    if fraction == 0 {
        return whole.to_string();
    }

    let fraction = format!("{:0width$}", fraction, width = decimals as usize);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

/// Shortens an address for display: `15oF4u…r6Sp5`
pub fn truncate_address(address: &str, keep: usize) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= keep * 2 + 1 {
        return address.to_string();
    }
    let head: String = chars[..keep].iter().collect();
    let tail: String = chars[chars.len() - keep..].iter().collect();
    format!("{}…{}", head, tail)
}
