// File: ./src/model/alarm.rs
use std::fmt;
use strum::{EnumIter, IntoEnumIterator};

/// Reminder choices offered when editing an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum AlarmPreset {
    None,
    AtStart,
    TenMinutes,
    ThirtyMinutes,
    OneHour,
    ThreeHours,
    OneDay,
    TwoDays,
    Custom,
}

impl AlarmPreset {
    /// Minutes before start, `None` for [`AlarmPreset::None`] and `Custom`.
    pub fn minutes(self) -> Option<u32> {
        match self {
            AlarmPreset::None | AlarmPreset::Custom => None,
            AlarmPreset::AtStart => Some(0),
            AlarmPreset::TenMinutes => Some(10),
            AlarmPreset::ThirtyMinutes => Some(30),
            AlarmPreset::OneHour => Some(60),
            AlarmPreset::ThreeHours => Some(180),
            AlarmPreset::OneDay => Some(1440),
            AlarmPreset::TwoDays => Some(2880),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AlarmPreset::None => "無",
            AlarmPreset::AtStart => "當下",
            AlarmPreset::TenMinutes => "10 分鐘前",
            AlarmPreset::ThirtyMinutes => "30 分鐘前",
            AlarmPreset::OneHour => "1 小時前",
            AlarmPreset::ThreeHours => "3 小時前",
            AlarmPreset::OneDay => "1 天前",
            AlarmPreset::TwoDays => "2 天前",
            AlarmPreset::Custom => "自訂(分鐘)",
        }
    }

    /// Preset matching an event's alarm; unmatched minute counts are `Custom`.
    pub fn from_minutes(alarm: Option<u32>) -> Self {
        let Some(mins) = alarm else {
            return AlarmPreset::None;
        };
        AlarmPreset::iter()
            .find(|p| p.minutes() == Some(mins))
            .unwrap_or(AlarmPreset::Custom)
    }
}

impl fmt::Display for AlarmPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Human label for an alarm value, spelling out custom minute counts.
pub fn describe_alarm(alarm: Option<u32>) -> String {
    match (AlarmPreset::from_minutes(alarm), alarm) {
        (AlarmPreset::Custom, Some(mins)) => format!("{} 分鐘前", mins),
        (preset, _) => preset.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_lookup() {
        assert_eq!(AlarmPreset::from_minutes(None), AlarmPreset::None);
        assert_eq!(AlarmPreset::from_minutes(Some(0)), AlarmPreset::AtStart);
        assert_eq!(AlarmPreset::from_minutes(Some(1440)), AlarmPreset::OneDay);
        assert_eq!(AlarmPreset::from_minutes(Some(45)), AlarmPreset::Custom);
    }

    #[test]
    fn preset_minutes_map_back_to_preset() {
        for preset in AlarmPreset::iter().filter(|p| *p != AlarmPreset::Custom) {
            assert_eq!(AlarmPreset::from_minutes(preset.minutes()), preset);
        }
    }

    #[test]
    fn describes_custom_values() {
        assert_eq!(describe_alarm(Some(45)), "45 分鐘前");
        assert_eq!(describe_alarm(Some(2880)), "2 天前");
        assert_eq!(describe_alarm(None), "無");
    }
}
