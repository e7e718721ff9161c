//! EOL status evaluation.
//!
//! Given a product's cycles (newest first, as the store returns them) and a
//! component version, pick the governing cycle and classify it against a
//! forward-looking window:
//!
//! | Cycle data                              | Status     |
//! |-----------------------------------------|------------|
//! | EOL flag set                            | `Eol`      |
//! | EOL date on or before today             | `Eol`      |
//! | EOL date before today + window          | `EolSoon`  |
//! | EOL date later                          | `Active`   |
//! | no usable date, cycle maintained        | `Active`   |
//! | anything else / no matching cycle       | `Unknown`  |

use crate::model::{Cycle, EolStatus, Evaluation, Milestone};
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};

/// Default forward-looking window in days.
pub const DEFAULT_FORWARD_LOOKUP_DAYS: u32 = 90;

/// Evaluate `version` against `cycles` relative to today.
#[must_use]
pub fn evaluate(cycles: &[Cycle], version: &str, forward_lookup_days: u32) -> Evaluation {
    evaluate_at(cycles, version, forward_lookup_days, Utc::now().date_naive())
}

/// Evaluate `version` against `cycles` relative to `today`.
#[must_use]
pub fn evaluate_at(
    cycles: &[Cycle],
    version: &str,
    forward_lookup_days: u32,
    today: NaiveDate,
) -> Evaluation {
    let Some(cycle) = match_cycle(cycles, version) else {
        return Evaluation::unknown();
    };

    let mut eval = Evaluation {
        matched_cycle: Some(cycle.name.clone()),
        is_lts: cycle.is_lts,
        latest_version: cycle.latest_version.clone(),
        ..Evaluation::default()
    };

    if cycle.eol.is_flagged() {
        eval.status = EolStatus::Eol;
        return eval;
    }

    if let Milestone::Date(raw) = &cycle.eol
        && let Some(eol) = parse_eol_date(raw)
    {
        eval.eol_date = Some(raw.clone());
        let horizon = today
            .checked_add_days(Days::new(u64::from(forward_lookup_days)))
            .unwrap_or(NaiveDate::MAX);
        let days = (eol - today).num_days();
        if eol <= today {
            eval.status = EolStatus::Eol;
        } else if eol < horizon {
            eval.status = EolStatus::EolSoon;
            eval.days_until_eol = Some(days);
        } else {
            eval.status = EolStatus::Active;
            eval.days_until_eol = Some(days);
        }
        return eval;
    }

    if cycle.is_maintained {
        eval.status = EolStatus::Active;
    }
    eval
}

/// The cycle governing `version`: the first prefix match in order, else the
/// first cycle sharing its major token.
#[must_use]
pub fn match_cycle<'a>(cycles: &'a [Cycle], version: &str) -> Option<&'a Cycle> {
    cycles
        .iter()
        .find(|c| matches_version(version, &c.name))
        .or_else(|| cycles.iter().find(|c| matches_major_version(version, &c.name)))
}

/// `version` equals `cycle` or extends it after a `.` or `-` boundary.
///
/// `3.9.1` matches `3.9`; `3.91` does not.
#[must_use]
pub fn matches_version(version: &str, cycle: &str) -> bool {
    if version == cycle {
        return true;
    }
    version
        .strip_prefix(cycle)
        .is_some_and(|rest| rest.starts_with(['.', '-']))
}

/// Both sides have the same non-empty major token.
#[must_use]
pub fn matches_major_version(version: &str, cycle: &str) -> bool {
    let major = major_token(version);
    !major.is_empty() && major == major_token(cycle)
}

/// Leading `.`-separated token with one leading `v` removed.
#[must_use]
pub fn major_token(version: &str) -> &str {
    let v = version.strip_prefix('v').unwrap_or(version);
    v.split('.').next().unwrap_or_default()
}

/// Parse an EOL date in RFC 3339, `YYYY-MM-DDTHH:MM:SSZ` or `YYYY-MM-DD` form.
#[must_use]
pub fn parse_eol_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%SZ") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
