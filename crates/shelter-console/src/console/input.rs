use super::state::{ProfileField, ProfileFlag};
use crate::gateway::{ApplicantProfile, SpecialCircumstance};

/// Read the leading integer of a form value the way a lenient numeric input does: leading
/// whitespace and a sign are accepted, anything after the digits is ignored.
pub(crate) fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if end == 0 {
        return None;
    }

    let magnitude = unsigned[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// 0..=100; unparseable input reads as 0.
pub fn coerce_percent(raw: &str) -> u8 {
    parse_leading_int(raw).map_or(0, |value| value.clamp(0, 100) as u8)
}

/// Non-negative count; unparseable input reads as 0.
pub fn coerce_count(raw: &str) -> u32 {
    parse_leading_int(raw).map_or(0, |value| value.clamp(0, i64::from(u32::MAX)) as u32)
}

/// Household size is at least one; unparseable or zero input reads as 1.
pub fn coerce_family_size(raw: &str) -> u32 {
    match parse_leading_int(raw) {
        Some(value) if value != 0 => value.clamp(1, i64::from(u32::MAX)) as u32,
        _ => 1,
    }
}

/// Add the tag when absent, remove it when present. Returns whether the tag is now set.
/// The remaining tags keep their relative order.
pub fn toggle_circumstance(tags: &mut Vec<SpecialCircumstance>, tag: SpecialCircumstance) -> bool {
    match tags.iter().position(|existing| *existing == tag) {
        Some(index) => {
            tags.remove(index);
            false
        }
        None => {
            tags.push(tag);
            true
        }
    }
}

impl ApplicantProfile {
    pub fn set_numeric(&mut self, field: ProfileField, raw: &str) {
        match field {
            ProfileField::PovertyLevel => self.poverty_level = coerce_percent(raw),
            ProfileField::UnemploymentDuration => self.unemployment_duration = coerce_count(raw),
            ProfileField::FamilySize => self.family_size = coerce_family_size(raw),
        }
    }

    pub fn set_flag(&mut self, flag: ProfileFlag, value: bool) {
        match flag {
            ProfileFlag::HasDisability => self.has_disability = value,
            ProfileFlag::IsElderly => self.is_elderly = value,
            ProfileFlag::IsSingleParent => self.is_single_parent = value,
            ProfileFlag::MinorityStatus => self.minority_status = value,
        }
    }

    pub fn toggle_circumstance(&mut self, tag: SpecialCircumstance) -> bool {
        toggle_circumstance(&mut self.special_circumstances, tag)
    }
}
