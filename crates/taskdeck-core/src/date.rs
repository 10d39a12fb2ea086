//! Due-date string handling.
//!
//! Tasks store their due date in DD/MM/YYYY display form; the editable
//! control format is YYYY-MM-DD. Sorting never parses a real date: it
//! rebuilds a YYYYMMDD token from the display string, and anything that
//! does not split into three `/` parts tokenizes as the minimum so it
//! sorts first ascending.

use std::sync::OnceLock;

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use regex::Regex;

/// Token for a display string that is not three `/`-separated parts.
const MALFORMED_TOKEN: &str = "00000000";

fn control_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<year>\d{4})-(?P<month>\d{1,2})-(?P<day>\d{1,2})$")
            .expect("static regex compiles")
    })
}

/// Comparable token for sorting by due date: `YYYY` + `MM` + `DD`
/// concatenated verbatim. No padding and no validation beyond the
/// three-part shape; a malformed string gets the minimum token.
pub fn sort_token(display: &str) -> String {
    let parts: Vec<&str> = display.split('/').collect();
    if parts.len() == 3 {
        format!("{}{}{}", parts[2], parts[1], parts[0])
    } else {
        MALFORMED_TOKEN.to_string()
    }
}

/// Convert a stored DD/MM/YYYY string into the control's YYYY-MM-DD
/// form. A 2-digit year is assumed to be in the 2000s.
pub fn display_to_control(display: &str) -> anyhow::Result<String> {
    let parts: Vec<&str> = display.split('/').collect();
    if parts.len() != 3 {
        return Err(anyhow!("invalid stored date: {display}"));
    }

    let year = if parts[2].len() == 2 {
        format!("20{}", parts[2])
    } else {
        parts[2].to_string()
    };

    Ok(format!("{}-{}-{}", year, parts[1], parts[0]))
}

/// Convert a submitted YYYY-MM-DD control value into the stored
/// DD/MM/YYYY form. This is the form boundary: the value must be a
/// real calendar date or submission is rejected.
pub fn control_to_display(control: &str) -> anyhow::Result<String> {
    let caps = control_re()
        .captures(control)
        .ok_or_else(|| anyhow!("invalid due date: {control} (expected YYYY-MM-DD)"))?;

    let year_text = &caps["year"];
    let month_text = &caps["month"];
    let day_text = &caps["day"];

    let year: i32 = year_text.parse().context("invalid year")?;
    let month: u32 = month_text.parse().context("invalid month")?;
    let day: u32 = day_text.parse().context("invalid day")?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| anyhow!("not a real calendar date: {control}"))?;

    Ok(format!("{day_text}/{month_text}/{year_text}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_control_roundtrip_is_identity_for_four_digit_years() {
        for display in ["25/12/2025", "01/01/2026", "05/09/2031"] {
            let control = display_to_control(display).expect("to control");
            let back = control_to_display(&control).expect("back to display");
            assert_eq!(back, display);
        }
    }

    #[test]
    fn two_digit_year_expands_to_2000s() {
        let control = display_to_control("15/12/25").expect("to control");
        assert_eq!(control, "2025-12-15");
        assert_eq!(
            control_to_display(&control).expect("to display"),
            "15/12/2025"
        );
    }

    #[test]
    fn malformed_display_string_gets_minimum_token() {
        assert_eq!(sort_token("soon"), "00000000");
        assert_eq!(sort_token("12-05-2026"), "00000000");
        assert_eq!(sort_token(""), "00000000");
        assert!(sort_token("soon") < sort_token("01/01/1990"));
    }

    #[test]
    fn sort_token_orders_earlier_dates_first() {
        assert!(sort_token("01/12/2025") < sort_token("15/12/2025"));
        assert!(sort_token("15/12/2025") < sort_token("25/12/2025"));
        assert!(sort_token("31/12/2025") < sort_token("01/01/2026"));
    }

    #[test]
    fn control_parse_rejects_impossible_dates() {
        assert!(control_to_display("2026-02-31").is_err());
        assert!(control_to_display("2026-13-01").is_err());
        assert!(control_to_display("tomorrow").is_err());
        assert!(control_to_display("26-02-01").is_err());
        assert!(control_to_display("2024-02-29").is_ok());
    }
}
