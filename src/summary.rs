use crate::calendar::YearMonth;
use crate::content::{ContentItem, Status};
use std::fmt;

/// Per-status counts of the content scheduled within a month.  The platform
/// filter is not applied.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct ContentSummary {
    pub(crate) total: usize,
    pub(crate) drafts: usize,
    pub(crate) scheduled: usize,
    pub(crate) published: usize,
    pub(crate) failed: usize,
}

impl ContentSummary {
    pub(crate) fn for_month(month: YearMonth, items: &[ContentItem]) -> ContentSummary {
        items
            .iter()
            .filter(|item| item.scheduled_day().is_some_and(|d| month.contains(d)))
            .fold(ContentSummary::default(), |mut summary, item| {
                summary.total += 1;
                match item.status {
                    Some(Status::Draft) => summary.drafts += 1,
                    Some(Status::Scheduled) => summary.scheduled += 1,
                    Some(Status::Published) => summary.published += 1,
                    Some(Status::Failed) => summary.failed += 1,
                    Some(Status::Other(_)) | None => (),
                }
                summary
            })
    }
}

impl fmt::Display for ContentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total {} | Scheduled {} | Published {} | Drafts {} | Failed {}",
            self.total, self.scheduled, self.published, self.drafts, self.failed
        )
    }
}
