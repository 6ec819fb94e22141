use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Identifier of a toast notification.
///
/// Built from a millisecond timestamp, a process-wide counter and a random
/// suffix: `notification-{millis}-{counter}-{random}`. The counter keeps ids
/// unique when several toasts are raised within the same millisecond.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let counter = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let suffix: u32 = rand::thread_rng().gen_range(0..=u32::MAX);
        Self(format!("notification-{}-{}-{:08x}", millis, counter, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_unique_under_rapid_fire() {
        let ids: HashSet<NotificationId> = (0..10_000).map(|_| NotificationId::generate()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_generated_id_format() {
        let id = NotificationId::generate();
        let parts: Vec<&str> = id.as_str().split('-').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "notification");
        assert!(parts[1].parse::<i64>().is_ok());
        assert!(parts[2].parse::<u64>().is_ok());
        assert_eq!(parts[3].len(), 8);
    }

    #[test]
    fn test_concurrent_generation_is_unique() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    (0..500)
                        .map(|_| NotificationId::generate())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(all.insert(id));
            }
        }
        assert_eq!(all.len(), 4000);
    }
}
