use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{ApplicationRecord, Status};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    /// Always holds every known status, zero counts included.
    pub counts_by_status: BTreeMap<Status, usize>,
    /// Records whose status is not one of the known ones.
    pub other: usize,
}

impl Summary {
    pub fn count(&self, status: &Status) -> usize {
        self.counts_by_status.get(status).copied().unwrap_or(0)
    }
}

pub fn summarize(records: &[ApplicationRecord]) -> Summary {
    let mut counts_by_status: BTreeMap<Status, usize> =
        Status::KNOWN.into_iter().map(|status| (status, 0)).collect();
    let mut other = 0;

    for record in records {
        match counts_by_status.get_mut(&record.details.status) {
            Some(count) => *count += 1,
            None => other += 1,
        }
    }

    Summary {
        total: records.len(),
        counts_by_status,
        other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApplicationDraft;

    fn with_status(status: Status) -> ApplicationRecord {
        ApplicationRecord {
            id: status.to_string(),
            details: ApplicationDraft {
                status,
                ..ApplicationDraft::new("Acme", "SWE")
            },
        }
    }

    #[test]
    fn counts_each_status_and_reports_zeroes() {
        let records = vec![
            with_status(Status::Applied),
            with_status(Status::Applied),
            with_status(Status::Accepted),
        ];
        let summary = summarize(&records);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.count(&Status::Applied), 2);
        assert_eq!(summary.count(&Status::Interviewing), 0);
        assert_eq!(summary.count(&Status::Accepted), 1);
        assert_eq!(summary.count(&Status::Rejected), 0);
        assert_eq!(summary.counts_by_status.len(), 4);
        assert_eq!(summary.other, 0);
    }

    #[test]
    fn unknown_statuses_count_toward_total_only() {
        let records = vec![
            with_status(Status::Unknown("Ghosted".to_string())),
            with_status(Status::Rejected),
        ];
        let summary = summarize(&records);

        assert_eq!(summary.total, 2);
        assert_eq!(summary.other, 1);
        assert_eq!(summary.count(&Status::Rejected), 1);
        assert!(!summary
            .counts_by_status
            .contains_key(&Status::Unknown("Ghosted".to_string())));
    }

    #[test]
    fn empty_list_reports_all_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.counts_by_status.values().all(|&count| count == 0));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(summarize(&[with_status(Status::Accepted)])).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["countsByStatus"]["Accepted"], 1);
        assert_eq!(value["countsByStatus"]["Applied"], 0);
        assert_eq!(value["other"], 0);
    }
}
