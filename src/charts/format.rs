//! Label formatting for ticks and tooltips.

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Full month name; `None` outside `1..=12`.
pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(index).copied()
}

/// Three-letter month label ("Jan").
pub fn month_abbrev(month: u32) -> Option<&'static str> {
    month_name(month).map(|name| &name[..3])
}

/// Month tick label, as a name or as the plain month number.
pub fn month_tick(month: u32, use_names: bool) -> String {
    match month_abbrev(month) {
        Some(abbrev) if use_names => abbrev.to_string(),
        _ => month.to_string(),
    }
}

/// SI-abbreviated value with trailing zeros trimmed: `20000 -> "20k"`, `1.5e8 -> "150M"`.
pub fn si_abbreviate(value: f64) -> String {
    const PREFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "G"), (1e6, "M"), (1e3, "k")];

    let magnitude = value.abs();
    for (scale, suffix) in PREFIXES {
        if magnitude >= scale {
            return format!("{}{}", trim_decimals(value / scale, 2), suffix);
        }
    }
    trim_decimals(value, 2)
}

/// Integer part grouped by thousands: `220000 -> "220,000"`, `0.25 -> "0.25"`.
pub fn group_thousands(value: f64) -> String {
    let text = trim_decimals(value, 2);
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Y-axis tick label.
pub fn value_tick(value: f64, abbreviate: bool) -> String {
    if abbreviate {
        si_abbreviate(value)
    } else {
        group_thousands(value)
    }
}

fn trim_decimals(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}
