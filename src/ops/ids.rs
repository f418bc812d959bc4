use chrono::Utc;
use uuid::Uuid;

use crate::model::task::TaskId;

/// Width of the millisecond stamp at the front of every id
const STAMP_DIGITS: usize = 13;
/// Length of the random base36 tail
const SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Allocates task ids of the form `<13-digit epoch millis><9 base36 chars>`.
///
/// The millisecond stamp strictly increases across calls (bumped by one when
/// the clock has not moved or went backwards), so two ids from one generator
/// never share a stamp. The random tail keeps ids from separate processes
/// apart.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last_stamp: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator whose stamps start after every stamp found in `existing`.
    /// Ids that don't start with a millisecond stamp are ignored.
    pub fn seeded<'a>(existing: impl IntoIterator<Item = &'a TaskId>) -> Self {
        let last_stamp = existing
            .into_iter()
            .filter_map(|id| stamp_of(id.as_str()))
            .max()
            .unwrap_or(0);
        IdGenerator { last_stamp }
    }

    pub fn next_id(&mut self) -> TaskId {
        let now = Utc::now().timestamp_millis();
        let stamp = if now > self.last_stamp {
            now
        } else {
            self.last_stamp + 1
        };
        self.last_stamp = stamp;
        TaskId::new(format!(
            "{:0width$}{}",
            stamp,
            random_suffix(),
            width = STAMP_DIGITS
        ))
    }
}

/// Leading millisecond stamp of an id in generator format
fn stamp_of(id: &str) -> Option<i64> {
    let head = id.get(..STAMP_DIGITS)?;
    if !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    head.parse().ok()
}

fn random_suffix() -> String {
    let mut n = Uuid::new_v4().as_u128();
    let mut out = String::with_capacity(SUFFIX_LEN);
    for _ in 0..SUFFIX_LEN {
        out.push(BASE36[(n % 36) as usize] as char);
        n /= 36;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_have_stamp_and_suffix() {
        let mut ids = IdGenerator::new();
        let id = ids.next_id();
        assert_eq!(id.as_str().len(), STAMP_DIGITS + SUFFIX_LEN);
        assert!(stamp_of(id.as_str()).is_some());
        assert!(
            id.as_str()[STAMP_DIGITS..]
                .bytes()
                .all(|b| BASE36.contains(&b))
        );
    }

    #[test]
    fn rapid_ids_are_unique_with_increasing_stamps() {
        let mut ids = IdGenerator::new();
        let batch: Vec<TaskId> = (0..5000).map(|_| ids.next_id()).collect();

        let unique: HashSet<&TaskId> = batch.iter().collect();
        assert_eq!(unique.len(), batch.len());

        let stamps: Vec<i64> = batch.iter().filter_map(|id| stamp_of(id.as_str())).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn seeded_generator_starts_after_existing_stamps() {
        let future = TaskId::new("9999999999990abcdefghi");
        let legacy = TaskId::new("not-a-stamped-id");
        let mut ids = IdGenerator::seeded([&future, &legacy]);
        let next = ids.next_id();
        assert_eq!(stamp_of(next.as_str()), Some(9_999_999_999_991));
    }

    #[test]
    fn stamp_of_rejects_short_or_non_numeric() {
        assert_eq!(stamp_of("123"), None);
        assert_eq!(stamp_of("17000000000ab"), None);
        assert_eq!(stamp_of("1700000000000k3j5h2l9q"), Some(1_700_000_000_000));
    }
}
