use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use skmis_application::{AuditTrailPage, PageButton, PageView, RecordStatistics};
use skmis_domain::ManagedRecord;

const TITLE_WIDTH: usize = 48;

pub fn record_table<R: ManagedRecord>(view: &PageView<'_, R>, now: DateTime<Utc>) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:>6}  {:<11}  {:<18}  {:<24}  TITLE",
        "ID", "STATUS", "CATEGORY", "TAGS"
    );

    if view.records.is_empty() {
        let _ = writeln!(output, "  (no {} records match the current filters)", R::LABEL);
    }

    for record in &view.records {
        let title = record
            .search_fields()
            .into_iter()
            .find(|field| !field.trim().is_empty())
            .map(|field| truncate(field.trim(), TITLE_WIDTH))
            .unwrap_or_default();
        let tags = record.tags(now);
        let _ = writeln!(
            output,
            "{:>6}  {:<11}  {:<18}  {:<24}  {}",
            record.id().value(),
            record.status().as_str(),
            record.category().unwrap_or("-"),
            if tags.is_empty() { "-".to_owned() } else { tags.join(",") },
            title
        );
    }

    if view.stale {
        let _ = writeln!(output, "  (filters changed since the last fetch; refresh to update)");
    }
    let _ = writeln!(
        output,
        "page {} of {} ({} matching)",
        view.current_page, view.total_pages, view.total_items
    );
    let _ = write!(output, "{}", page_buttons(&view.buttons, view.current_page));
    output
}

pub fn page_buttons(buttons: &[PageButton], current_page: usize) -> String {
    buttons
        .iter()
        .map(|button| match button {
            PageButton::Page(page) if *page == current_page => format!("[{page}]"),
            PageButton::Page(page) => page.to_string(),
            PageButton::Ellipsis => "...".to_owned(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn statistics(label: &str, statistics: &RecordStatistics) -> String {
    let mut output = format!("{label} statistics\n");
    for (name, count) in &statistics.counts {
        let _ = writeln!(output, "  {name:<16} {count:>6}");
    }
    output
}

pub fn audit_trail(page: &AuditTrailPage) -> String {
    let mut output = String::new();
    for entry in &page.entries {
        let record = entry
            .record_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_owned());
        let _ = writeln!(
            output,
            "{}  {:<10}  record {:<6}  by {}{}",
            entry.created_at,
            entry.action,
            record,
            entry.performed_by,
            entry
                .details
                .as_deref()
                .map(|details| format!("  ({details})"))
                .unwrap_or_default()
        );
    }
    let _ = write!(
        output,
        "page {} of {} ({} entries)",
        page.pagination.current_page, page.pagination.total_pages, page.pagination.total_items
    );
    output
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_owned();
    }
    let mut truncated: String = value.chars().take(width.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use skmis_application::{PageButton, PageView, SelectAllState};
    use skmis_core::RecordId;
    use skmis_domain::{RecordStatus, YouthProfile};

    use super::{page_buttons, record_table, truncate};

    #[test]
    fn current_page_is_bracketed() {
        let buttons = [
            PageButton::Page(1),
            PageButton::Ellipsis,
            PageButton::Page(4),
            PageButton::Page(5),
            PageButton::Page(6),
            PageButton::Ellipsis,
            PageButton::Page(12),
        ];
        assert_eq!(page_buttons(&buttons, 5), "1 ... 4 [5] 6 ... 12");
    }

    #[test]
    fn long_titles_are_truncated_on_char_boundaries() {
        assert_eq!(truncate("Pagdiriwang ng Linggo ng Kabataan", 12), "Pagdiriw...");
        assert_eq!(truncate("Año", 12), "Año");
    }

    #[test]
    fn record_rows_show_derived_tags() {
        let profile = YouthProfile {
            id: RecordId::new(31),
            first_name: "Ana".to_owned(),
            middle_name: String::new(),
            last_name: "Reyes".to_owned(),
            birthdate: NaiveDate::from_ymd_opt(2004, 2, 1),
            gender: None,
            barangay: Some("Poblacion".to_owned()),
            youth_classification: None,
            status: RecordStatus::Active,
        };
        let view = PageView {
            records: vec![&profile],
            current_page: 1,
            total_pages: 1,
            total_items: 1,
            buttons: vec![PageButton::Page(1)],
            select_all: SelectAllState::Unchecked,
            stale: true,
        };
        let Some(now) = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).single() else {
            panic!("valid timestamp");
        };

        let table = record_table(&view, now);

        assert!(table.contains("core_youth"));
        assert!(table.contains("ana reyes"));
        assert!(table.contains("refresh to update"));
    }
}
