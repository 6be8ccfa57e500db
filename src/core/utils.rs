/// Lowercase alphanumeric key used for every effect and species id.
pub fn to_id(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

/// Stage multiplier as a fraction: +1 is 3/2, -1 is 2/3.
pub fn stage_fraction(stage: i32) -> (i64, i64) {
    let s = stage.clamp(-6, 6) as i64;
    if s >= 0 {
        (2 + s, 2)
    } else {
        (2, 2 - s)
    }
}

/// Applies a stat stage to a raw stat, flooring like the cartridge does.
pub fn apply_stage(stat: i64, stage: i32) -> i64 {
    let (num, den) = stage_fraction(stage);
    stat * num / den
}
