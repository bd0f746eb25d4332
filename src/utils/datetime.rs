use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use regex::Regex;

/// 解析抽奖结束时间表达式:
/// - 相对: "3h" / "45m" / "2d", 可组合 ("1d 3h")
/// - 精确: "12:10 10.10.2023" (HH:MM dd.mm.YYYY, 按 UTC 解释)
///
/// 精确时间优先于相对偏移; 无法解析时返回 None
pub fn parse_end_time(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let hours_re = Regex::new(r"(\d+)\s*h").ok()?;
    let minutes_re = Regex::new(r"(\d+)\s*m").ok()?;
    let days_re = Regex::new(r"(\d+)\s*d").ok()?;
    let exact_re = Regex::new(r"(\d{1,2}:\d{2}\s+\d{1,2}\.\d{2}\.\d{4})").ok()?;

    if let Some(caps) = exact_re.captures(text) {
        let parsed = NaiveDateTime::parse_from_str(&caps[1], "%H:%M %d.%m.%Y").ok()?;
        return Some(DateTime::from_naive_utc_and_offset(parsed, Utc));
    }

    let mut result = now;
    let mut matched = false;

    if let Some(caps) = days_re.captures(text)
        && let Ok(days) = caps[1].parse::<i64>()
    {
        result += Duration::days(days);
        matched = true;
    }
    if let Some(caps) = hours_re.captures(text)
        && let Ok(hours) = caps[1].parse::<i64>()
    {
        result += Duration::hours(hours);
        matched = true;
    }
    if let Some(caps) = minutes_re.captures(text)
        && let Ok(minutes) = caps[1].parse::<i64>()
    {
        result += Duration::minutes(minutes);
        matched = true;
    }

    if matched { Some(result) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 10, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn relative_hours() {
        let end = parse_end_time("3h", base()).unwrap();
        assert_eq!(end, base() + Duration::hours(3));
    }

    #[test]
    fn relative_combined() {
        let end = parse_end_time("1d 2h 30m", base()).unwrap();
        assert_eq!(
            end,
            base() + Duration::days(1) + Duration::hours(2) + Duration::minutes(30)
        );
    }

    #[test]
    fn exact_datetime() {
        let end = parse_end_time("12:10 10.10.2023", base()).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2023, 10, 10, 12, 10, 0).unwrap());
    }

    #[test]
    fn exact_wins_over_relative() {
        // "10.10.2023" 里的 "d" 不应当被当作天数偏移
        let end = parse_end_time("12:10 10.10.2023", base()).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2023, 10, 10, 12, 10, 0).unwrap());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_end_time("soon", base()).is_none());
        assert!(parse_end_time("", base()).is_none());
    }
}
