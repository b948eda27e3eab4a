//! Padel scoring rules for a best-of-three match with a super tiebreak in
//! place of the third set.

use crate::{SetScore, Side};

/// Index of the set played as a super tiebreak.
const SUPER_TIEBREAK: usize = 2;

/// Returns whether `team1`/`team2` is a legal final score for the set at
/// `set_index`.
///
/// Sets 1 and 2 follow regular padel scoring: 6-0 up to 6-4, 7-5 or 7-6.
/// The third set is a super tiebreak: first to 10 with two clear points,
/// capped at 22-20.
pub fn validate_set_score(team1: u8, team2: u8, set_index: usize) -> bool {
    let max = team1.max(team2);
    let min = team1.min(team2);

    if set_index == SUPER_TIEBREAK {
        if max < 10 || max > 22 {
            return false;
        }
        if min > 20 {
            return false;
        }
        // Two clear points, except at the 22-20 cap.
        if max - min < 2 {
            return false;
        }
        if max == 22 && min != 20 {
            return false;
        }

        return true;
    }

    if max < 6 || max > 7 {
        return false;
    }
    if min > 6 {
        return false;
    }
    // 6-6 and 6-5 must play on to 7.
    if max == 6 && min == 6 {
        return false;
    }
    if max == 6 && min == 5 {
        return false;
    }
    // 7 is only reachable from 5-5 or the tiebreak.
    if max == 7 && min < 5 {
        return false;
    }

    true
}

/// Returns whether `sets` is a finished best-of-three outcome.
///
/// Every set must be a legal score for its position; a single invalid set
/// makes the whole match incomplete. The match is complete once either side
/// has won exactly two sets.
pub fn is_match_complete(sets: &[SetScore]) -> bool {
    if sets.is_empty() {
        return false;
    }

    let mut team1 = 0;
    let mut team2 = 0;

    for (index, set) in sets.iter().enumerate() {
        if !validate_set_score(set.team1, set.team2, index) {
            return false;
        }

        match set.winner() {
            Side::Team1 => team1 += 1,
            Side::Team2 => team2 += 1,
        }
    }

    team1 == 2 || team2 == 2
}

/// Returns the winner of `sets`, or `None` while no side has two set wins.
///
/// Does not check set legality; validate first where that matters.
pub fn match_winner(sets: &[SetScore]) -> Option<Side> {
    let mut team1 = 0;
    let mut team2 = 0;

    for set in sets {
        match set.winner() {
            Side::Team1 => team1 += 1,
            Side::Team2 => team2 += 1,
        }
    }

    if team1 == 2 {
        Some(Side::Team1)
    } else if team2 == 2 {
        Some(Side::Team2)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{is_match_complete, match_winner, validate_set_score};
    use crate::{SetScore, Side};

    macro_rules! sets {
        ($(($a:expr, $b:expr)),*$(,)?) => {
            vec![$(SetScore::new($a, $b)),*]
        };
    }

    #[test]
    fn test_validate_regular_set() {
        macro_rules! test {
            ($($a:expr, $b:expr => $valid:expr),*,) => {
                $(
                    assert_eq!(validate_set_score($a, $b, 0), $valid, "{}-{}", $a, $b);
                    assert_eq!(validate_set_score($b, $a, 0), $valid, "{}-{}", $b, $a);
                )*
            };
        }

        test! {
            6, 0 => true,
            6, 1 => true,
            6, 2 => true,
            6, 3 => true,
            6, 4 => true,
            6, 5 => false,
            6, 6 => false,
            7, 5 => true,
            7, 6 => true,
            7, 0 => false,
            7, 4 => false,
            7, 7 => false,
            8, 6 => false,
            5, 3 => false,
            0, 0 => false,
        }

        // The second set follows the same rules.
        assert!(validate_set_score(7, 5, 1));
        assert!(!validate_set_score(6, 5, 1));
    }

    #[test]
    fn test_validate_super_tiebreak() {
        macro_rules! test {
            ($($a:expr, $b:expr => $valid:expr),*,) => {
                $(
                    assert_eq!(validate_set_score($a, $b, 2), $valid, "{}-{}", $a, $b);
                    assert_eq!(validate_set_score($b, $a, 2), $valid, "{}-{}", $b, $a);
                )*
            };
        }

        test! {
            10, 0 => true,
            10, 8 => true,
            10, 9 => false,
            11, 9 => true,
            12, 10 => true,
            21, 19 => true,
            22, 20 => true,
            22, 19 => false,
            23, 21 => false,
            9, 7 => false,
            10, 10 => false,
        }
    }

    #[test]
    fn test_match_complete() {
        assert!(!is_match_complete(&[]));

        // Straight sets.
        assert!(is_match_complete(&sets![(6, 2), (6, 3)]));
        assert!(is_match_complete(&sets![(2, 6), (5, 7)]));

        // Split after two sets: a third is required.
        assert!(!is_match_complete(&sets![(6, 2), (3, 6)]));
        assert!(is_match_complete(&sets![(6, 2), (3, 6), (10, 7)]));

        // An illegal set invalidates the whole match.
        assert!(!is_match_complete(&sets![(6, 5), (6, 3)]));
        assert!(!is_match_complete(&sets![(6, 2), (3, 6), (7, 5)]));
    }

    #[test]
    fn test_match_winner() {
        assert_eq!(match_winner(&[]), None);
        assert_eq!(match_winner(&sets![(6, 2)]), None);
        assert_eq!(match_winner(&sets![(6, 2), (3, 6)]), None);

        assert_eq!(match_winner(&sets![(6, 2), (6, 3)]), Some(Side::Team1));
        assert_eq!(match_winner(&sets![(2, 6), (5, 7)]), Some(Side::Team2));
        assert_eq!(
            match_winner(&sets![(6, 2), (3, 6), (8, 10)]),
            Some(Side::Team2)
        );
    }
}
