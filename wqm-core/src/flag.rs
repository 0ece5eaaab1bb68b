use crate::health::HealthStatus;

/// Flag icons, indexed by flag number.
pub const FLAG_ICONS: [&str; 4] = [
    "images/unknown.png",
    "images/good.png",
    "images/caution.png",
    "images/unhealthy.png",
];

impl HealthStatus {
    /// Flag number of this status: unknown 0, good 1, caution 2, unhealthy 3.
    pub fn flag_index(&self) -> usize {
        match self {
            HealthStatus::Unknown => 0,
            HealthStatus::Good => 1,
            HealthStatus::Caution => 2,
            HealthStatus::Unhealthy => 3,
        }
    }

    pub fn icon(&self) -> &'static str {
        FLAG_ICONS[self.flag_index()]
    }

    /// Status for a raw flag number. Missing or out-of-range flags are unknown.
    pub fn from_flag(flag: Option<i64>) -> HealthStatus {
        flag.and_then(|f| usize::try_from(f).ok())
            .and_then(|f| HealthStatus::ALL.get(f).copied())
            .unwrap_or(HealthStatus::Unknown)
    }
}

/// Icon for a raw flag number, falling back to the unknown flag.
pub fn flag_icon(flag: Option<i64>) -> &'static str {
    HealthStatus::from_flag(flag).icon()
}

#[cfg(test)]
mod tests {
    use super::{flag_icon, FLAG_ICONS};
    use crate::health::HealthStatus;

    #[test]
    fn test_flag_index_matches_icon_table() {
        for status in HealthStatus::ALL {
            assert_eq!(HealthStatus::from_flag(Some(status.flag_index() as i64)), status);
        }
        assert_eq!(HealthStatus::Good.icon(), "images/good.png");
        assert_eq!(HealthStatus::Unhealthy.icon(), FLAG_ICONS[3]);
    }

    #[test]
    fn test_out_of_range_flag_is_unknown() {
        assert_eq!(flag_icon(None), "images/unknown.png");
        assert_eq!(flag_icon(Some(-1)), "images/unknown.png");
        assert_eq!(flag_icon(Some(4)), "images/unknown.png");
        assert_eq!(flag_icon(Some(2)), "images/caution.png");
    }
}
