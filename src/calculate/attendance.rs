//! Attendance rates over distinct match days.

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::models::{AttendanceDay, AttendanceStats, MatchRecord, Player};

/// Default size of the recent-attendance window.
pub const RECENT_DAYS_WINDOW: usize = 10;

/// Compute attendance for the whole roster.
///
/// An attendance day is a club-local calendar day with at least one match;
/// a player attended it if they appear in any match that day, however many
/// they played. The count and rate cover the full history; `recent` exposes
/// per-day booleans for the most recent `window` days only. Output is
/// ranked by rate descending, then count descending.
pub fn attendance_stats(
    players: &[Player],
    matches: &[MatchRecord],
    tz: Tz,
    window: usize,
) -> Vec<AttendanceStats> {
    let mut all_days: Vec<NaiveDate> = matches.iter().map(|m| m.local_day(tz)).collect();
    all_days.sort_unstable();
    all_days.dedup();
    all_days.reverse();

    let total_match_days = all_days.len() as u32;

    let mut stats: Vec<AttendanceStats> = players
        .iter()
        .map(|player| {
            let mut attended_days: Vec<NaiveDate> = matches
                .iter()
                .filter(|m| m.involves(player.id))
                .map(|m| m.local_day(tz))
                .collect();
            attended_days.sort_unstable();
            attended_days.dedup();

            let attendance_count = attended_days.len() as u32;
            let attendance_rate = if total_match_days == 0 {
                0.0
            } else {
                attendance_count as f64 / total_match_days as f64 * 100.0
            };

            let recent: Vec<AttendanceDay> = all_days
                .iter()
                .take(window)
                .map(|day| AttendanceDay {
                    date: *day,
                    attended: attended_days.binary_search(day).is_ok(),
                })
                .collect();

            AttendanceStats {
                player_id: player.id,
                name: player.name.clone(),
                level: player.level,
                attendance_count,
                total_match_days,
                attendance_rate,
                recent,
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.attendance_rate
            .total_cmp(&a.attendance_rate)
            .then_with(|| b.attendance_count.cmp(&a.attendance_count))
            .then_with(|| a.name.cmp(&b.name))
    });
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchSubmission;
    use chrono::{TimeZone, Utc};

    const TZ: Tz = chrono_tz::Asia::Seoul;

    fn player(name: &str) -> Player {
        Player::new(name.to_string(), 3)
    }

    fn match_on(day: u32, winner: &Player, loser: &Player) -> MatchRecord {
        let sub = MatchSubmission {
            match_date: Utc.with_ymd_and_hms(2026, 3, day, 10, 0, 0).unwrap(),
            player_a: winner.id,
            sets_a: 3,
            player_b: loser.id,
            sets_b: 0,
        };
        MatchRecord::new(sub.normalize().unwrap(), sub.match_date, TZ)
    }

    #[test]
    fn test_three_of_five_days_is_sixty_percent() {
        let a = player("A");
        let b = player("B");
        let c = player("C");
        let roster = vec![a.clone(), b.clone(), c.clone()];

        // Five distinct match days; A plays on three of them
        let matches = vec![
            match_on(1, &a, &b),
            match_on(2, &a, &c),
            match_on(3, &b, &c),
            match_on(4, &a, &b),
            match_on(5, &b, &c),
        ];

        let stats = attendance_stats(&roster, &matches, TZ, RECENT_DAYS_WINDOW);
        let a_stats = stats.iter().find(|s| s.player_id == a.id).unwrap();
        assert_eq!(a_stats.total_match_days, 5);
        assert_eq!(a_stats.attendance_count, 3);
        assert_eq!(a_stats.attendance_rate, 60.0);
    }

    #[test]
    fn test_multiple_matches_one_day_count_once() {
        let a = player("A");
        let b = player("B");
        let c = player("C");
        let roster = vec![a.clone(), b.clone(), c.clone()];

        let matches = vec![match_on(1, &a, &b), match_on(1, &a, &c)];

        let stats = attendance_stats(&roster, &matches, TZ, RECENT_DAYS_WINDOW);
        let a_stats = stats.iter().find(|s| s.player_id == a.id).unwrap();
        assert_eq!(a_stats.attendance_count, 1);
        assert_eq!(a_stats.total_match_days, 1);
        assert_eq!(a_stats.attendance_rate, 100.0);
    }

    #[test]
    fn test_no_match_days_rate_is_zero() {
        let a = player("A");
        let stats = attendance_stats(&[a], &[], TZ, RECENT_DAYS_WINDOW);
        assert_eq!(stats[0].attendance_rate, 0.0);
        assert_eq!(stats[0].total_match_days, 0);
        assert!(stats[0].recent.is_empty());
    }

    #[test]
    fn test_recent_window_newest_first_and_capped() {
        let a = player("A");
        let b = player("B");
        let roster = vec![a.clone(), b.clone()];

        // Twelve distinct days, A present on all of them
        let matches: Vec<MatchRecord> = (1..=12).map(|d| match_on(d, &a, &b)).collect();

        let stats = attendance_stats(&roster, &matches, TZ, RECENT_DAYS_WINDOW);
        let a_stats = stats.iter().find(|s| s.player_id == a.id).unwrap();

        assert_eq!(a_stats.recent.len(), 10);
        assert_eq!(
            a_stats.recent[0].date,
            NaiveDate::from_ymd_opt(2026, 3, 12).unwrap()
        );
        assert!(a_stats.recent[0].date > a_stats.recent[9].date);
        // Full-history count is 12 even though the window shows 10
        assert_eq!(a_stats.attendance_count, 12);
    }

    #[test]
    fn test_recent_window_marks_missed_days() {
        let a = player("A");
        let b = player("B");
        let c = player("C");
        let roster = vec![a.clone(), b.clone(), c.clone()];

        let matches = vec![
            match_on(1, &a, &b),
            match_on(2, &b, &c), // A absent
            match_on(3, &a, &c),
        ];

        let stats = attendance_stats(&roster, &matches, TZ, RECENT_DAYS_WINDOW);
        let a_stats = stats.iter().find(|s| s.player_id == a.id).unwrap();
        let attended: Vec<bool> = a_stats.recent.iter().map(|d| d.attended).collect();
        // Newest first: day 3 yes, day 2 no, day 1 yes
        assert_eq!(attended, vec![true, false, true]);
    }

    #[test]
    fn test_ranked_by_rate_then_count() {
        let a = player("Always");
        let b = player("Sometimes");
        let c = player("Never");
        let roster = vec![a.clone(), b.clone(), c.clone()];

        let matches = vec![
            match_on(1, &a, &b),
            match_on(2, &a, &b),
            match_on(3, &a, &b),
        ];

        let stats = attendance_stats(&roster, &matches, TZ, RECENT_DAYS_WINDOW);
        assert_eq!(stats[0].player_id, a.id);
        assert_eq!(stats[2].player_id, c.id);
        assert_eq!(stats[2].attendance_rate, 0.0);
    }
}
