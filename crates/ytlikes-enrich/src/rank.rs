//! Popularity ordering of settled records.

use std::cmp::Ordering;
use std::ops::Deref;

use ytlikes_core::CommentRecord;

/// Records in report order. Read-only: the emitter can look but not touch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedComments {
    records: Vec<CommentRecord>,
}

impl RankedComments {
    /// The first `n` records, or all of them if there are fewer.
    #[must_use]
    pub fn top(&self, n: usize) -> &[CommentRecord] {
        &self.records[..n.min(self.records.len())]
    }
}

impl Deref for RankedComments {
    type Target = [CommentRecord];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

impl<'a> IntoIterator for &'a RankedComments {
    type Item = &'a CommentRecord;
    type IntoIter = std::slice::Iter<'a, CommentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Sorts by like count descending, then timestamp descending.
///
/// A known timestamp ranks above a missing one. Records that tie on both keep
/// their input order. Unfetched and failed records rank with zero likes.
#[must_use]
pub fn rank(mut records: Vec<CommentRecord>) -> RankedComments {
    records.sort_by(compare);
    RankedComments { records }
}

fn compare(a: &CommentRecord, b: &CommentRecord) -> Ordering {
    b.likes()
        .cmp(&a.likes())
        .then_with(|| b.timestamp.cmp(&a.timestamp))
}
