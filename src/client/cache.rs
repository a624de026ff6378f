use uuid::Uuid;

use crate::features::reports::dtos::ReportResponseDto;

/// The report lists the dashboard shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportView {
    All,
    Assigned,
    AssignedOpen,
    AssignedClosed,
}

impl ReportView {
    pub const EVERY: [ReportView; 4] = [
        ReportView::All,
        ReportView::Assigned,
        ReportView::AssignedOpen,
        ReportView::AssignedClosed,
    ];
}

/// Locally held snapshot of the four report lists.
///
/// Each view holds an id at most once. After a mutation the views are
/// re-partitioned locally instead of re-fetching everything.
#[derive(Debug, Default, Clone)]
pub struct ReportListCache {
    all: Vec<ReportResponseDto>,
    assigned: Vec<ReportResponseDto>,
    assigned_open: Vec<ReportResponseDto>,
    assigned_closed: Vec<ReportResponseDto>,
}

impl ReportListCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self, view: ReportView) -> &[ReportResponseDto] {
        match view {
            ReportView::All => &self.all,
            ReportView::Assigned => &self.assigned,
            ReportView::AssignedOpen => &self.assigned_open,
            ReportView::AssignedClosed => &self.assigned_closed,
        }
    }

    fn view_mut(&mut self, view: ReportView) -> &mut Vec<ReportResponseDto> {
        match view {
            ReportView::All => &mut self.all,
            ReportView::Assigned => &mut self.assigned,
            ReportView::AssignedOpen => &mut self.assigned_open,
            ReportView::AssignedClosed => &mut self.assigned_closed,
        }
    }

    /// Swap in a freshly fetched list
    pub fn replace_all(&mut self, view: ReportView, mut reports: Vec<ReportResponseDto>) {
        let mut seen = std::collections::HashSet::new();
        reports.retain(|r| seen.insert(r.id));
        *self.view_mut(view) = reports;
    }

    /// A newly filed report goes to the top of "all"
    pub fn apply_created(&mut self, report: ReportResponseDto) {
        upsert(&mut self.all, report);
    }

    /// Re-partition after a successful update
    pub fn apply_updated(&mut self, report: ReportResponseDto) {
        replace(&mut self.all, &report);
        replace(&mut self.assigned, &report);

        if report.status.is_completed() {
            remove(&mut self.assigned_open, report.id);
            upsert(&mut self.assigned_closed, report);
        } else {
            remove(&mut self.assigned_closed, report.id);
            upsert(&mut self.assigned_open, report);
        }
    }

    pub fn apply_deleted(&mut self, id: Uuid) {
        for view in ReportView::EVERY {
            remove(self.view_mut(view), id);
        }
    }

    /// Case-insensitive title/description match within one view
    pub fn search(&self, view: ReportView, term: &str) -> Vec<&ReportResponseDto> {
        let needle = term.trim().to_lowercase();
        self.view(view)
            .iter()
            .filter(|r| {
                needle.is_empty()
                    || r.title.to_lowercase().contains(&needle)
                    || r.description.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

fn replace(list: &mut [ReportResponseDto], report: &ReportResponseDto) {
    if let Some(slot) = list.iter_mut().find(|r| r.id == report.id) {
        *slot = report.clone();
    }
}

/// Replace in place if present, else prepend
fn upsert(list: &mut Vec<ReportResponseDto>, report: ReportResponseDto) {
    match list.iter_mut().find(|r| r.id == report.id) {
        Some(slot) => *slot = report,
        None => list.insert(0, report),
    }
}

fn remove(list: &mut Vec<ReportResponseDto>, id: Uuid) {
    list.retain(|r| r.id != id);
}
