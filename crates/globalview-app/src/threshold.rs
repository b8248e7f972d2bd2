// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ChartPoint;

/// Raw filter text plus its parsed minimum, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub text: String,
    pub parsed: Option<i64>,
}

impl FilterState {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let parsed = parse_threshold(&text);
        Self { text, parsed }
    }

    pub const fn is_active(&self) -> bool {
        self.parsed.is_some()
    }

    pub fn apply(&self, records: &[ChartPoint]) -> Vec<ChartPoint> {
        match self.parsed {
            Some(minimum) => records
                .iter()
                .filter(|record| meets_threshold(record.value, minimum))
                .cloned()
                .collect(),
            None => records.to_vec(),
        }
    }
}

/// Base-10 integer prefix parse: leading whitespace, optional sign, then
/// digits. Anything after the digits is ignored. No digits means `None`.
pub fn parse_threshold(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digit_count = digits.bytes().take_while(u8::is_ascii_digit).count();
    if digit_count == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for byte in digits[..digit_count].bytes() {
        let digit = i64::from(byte - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    Some(value)
}

/// Records with `value >= parsed(raw_filter_text)`; all records when the
/// text does not parse.
pub fn apply_threshold(records: &[ChartPoint], raw_filter_text: &str) -> Vec<ChartPoint> {
    FilterState::new(raw_filter_text).apply(records)
}

fn meets_threshold(value: u64, minimum: i64) -> bool {
    match u64::try_from(minimum) {
        Ok(minimum) => value >= minimum,
        Err(_) => true,
    }
}
