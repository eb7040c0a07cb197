use chrono::{DateTime, Utc};
use std::time::SystemTime;

const ISO_SECONDS: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Current UTC time, second resolution, e.g. `2024-05-01T12:30:45Z`.
pub fn now_iso() -> String {
    Utc::now().format(ISO_SECONDS).to_string()
}

/// Formats a filesystem timestamp the same way as [`now_iso`].
pub fn format_system_time(t: SystemTime) -> String {
    DateTime::<Utc>::from(t).format(ISO_SECONDS).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn formats_epoch() {
        let t = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        assert_eq!(format_system_time(t), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn now_iso_shape() {
        let now = now_iso();
        assert_eq!(now.len(), 20);
        assert!(now.ends_with('Z'));
        assert_eq!(&now[4..5], "-");
        assert_eq!(&now[10..11], "T");
    }
}
