//! Module providing the consumer's read position within a topic.

use super::{ProtocolError, Record};

/// The next offset a consumer will fetch from in a topic.
///
/// `next_offset` never decreases. It is either the configured start offset or one past the
/// highest offset of a record that has been delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    topic: String,
    next_offset: u64,
}

impl Cursor {
    pub fn new<T: Into<String>>(topic: T, start_offset: u64) -> Self {
        Self {
            topic: topic.into(),
            next_offset: start_offset,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn next_offset(&self) -> u64 {
        self.next_offset
    }

    /// Validates a batch fetched from this cursor's position and returns the offset one past
    /// its last record, or `None` for an empty batch.
    ///
    /// Every record must lie at or after `next_offset`, and offsets must be strictly
    /// ascending. Gaps between offsets are permitted.
    pub fn batch_end(&self, records: &[Record]) -> Result<Option<u64>, ProtocolError> {
        let mut previous: Option<u64> = None;

        for Record { offset, .. } in records {
            let offset = *offset;

            if offset < self.next_offset {
                return Err(ProtocolError::OffsetBeforeCursor {
                    cursor: self.next_offset,
                    offset,
                });
            }

            if let Some(previous) = previous.filter(|previous| offset <= *previous) {
                return Err(ProtocolError::NonAscendingOffsets { previous, offset });
            }

            previous = Some(offset);
        }

        previous
            .map(|last| last.checked_add(1).ok_or(ProtocolError::OffsetOverflow))
            .transpose()
    }

    /// Moves the cursor to `next_offset`, as obtained from [`Cursor::batch_end`].
    pub(crate) fn commit(&mut self, next_offset: u64) {
        debug_assert!(next_offset >= self.next_offset, "cursor must not regress");

        self.next_offset = next_offset;
    }
}

#[cfg(test)]
mod tests {
    use super::{Cursor, ProtocolError, Record};

    fn records(offsets: &[u64]) -> Vec<Record> {
        offsets
            .iter()
            .map(|&offset| Record {
                offset,
                payload: format!("payload-{offset}"),
            })
            .collect()
    }

    #[test]
    fn test_batch_end() {
        let cursor = Cursor::new("demo-topic", 5);

        assert_eq!(cursor.batch_end(&[]).unwrap(), None);
        assert_eq!(cursor.batch_end(&records(&[5])).unwrap(), Some(6));
        assert_eq!(cursor.batch_end(&records(&[5, 6, 7])).unwrap(), Some(8));
        assert_eq!(cursor.batch_end(&records(&[9, 12, 40])).unwrap(), Some(41));
    }

    #[test]
    fn test_batch_end_rejects_untrustworthy_batches() {
        let cursor = Cursor::new("demo-topic", 5);

        assert!(matches!(
            cursor.batch_end(&records(&[4, 5])),
            Err(ProtocolError::OffsetBeforeCursor {
                cursor: 5,
                offset: 4
            })
        ));

        assert!(matches!(
            cursor.batch_end(&records(&[5, 7, 6])),
            Err(ProtocolError::NonAscendingOffsets {
                previous: 7,
                offset: 6
            })
        ));

        assert!(matches!(
            cursor.batch_end(&records(&[5, 5])),
            Err(ProtocolError::NonAscendingOffsets {
                previous: 5,
                offset: 5
            })
        ));

        assert!(matches!(
            cursor.batch_end(&records(&[u64::MAX])),
            Err(ProtocolError::OffsetOverflow)
        ));
    }

    #[test]
    fn test_commit() {
        let mut cursor = Cursor::new("demo-topic", 0);

        let next_offset = cursor.batch_end(&records(&[0, 1])).unwrap().unwrap();
        cursor.commit(next_offset);

        assert_eq!(cursor.next_offset(), 2);
        assert_eq!(cursor.topic(), "demo-topic");
    }
}
