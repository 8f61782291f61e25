use chrono::NaiveDate;
use recordkeep_core::db::open_db_in_memory;
use recordkeep_core::{
    plan_query, ListRequest, Record, RecordFields, RecordId, RecordRepository, RecordService,
    SortOrder, SqliteRecordRepository, TitleFilter,
};
use rusqlite::Connection;
use std::num::NonZeroU32;

fn seed(repo: &SqliteRecordRepository<'_>, title: &str, start: &str) -> Record {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    repo.create_record(&RecordFields::new(title, start, "").unwrap())
        .unwrap()
}

fn set_created_at(conn: &Connection, id: RecordId, created_at_ms: i64) {
    conn.execute(
        "UPDATE records SET created_at = ?1 WHERE uuid = ?2;",
        rusqlite::params![created_at_ms, id.to_string()],
    )
    .unwrap();
}

fn request(page: &str, limit: &str, search: &str, sort_by: Option<&str>) -> ListRequest {
    ListRequest::from_params(Some(page), Some(limit), Some(search), sort_by)
}

fn titles(records: &[Record]) -> Vec<&str> {
    records.iter().map(|record| record.title.as_str()).collect()
}

#[test]
fn twenty_five_records_paginate_into_three_pages() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    for index in 0..25 {
        seed(&repo, &format!("record {index:02}"), "2024-01-01");
    }
    let service = RecordService::new(repo);

    let first = service.list_records(&request("1", "10", "", None)).unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total, 25);
    assert_eq!(first.total_pages, 3);

    let third = service.list_records(&request("3", "10", "", None)).unwrap();
    assert_eq!(third.items.len(), 5);
    assert_eq!(third.total_pages, 3);

    let beyond = service.list_records(&request("4", "10", "", None)).unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 25);
}

#[test]
fn pages_are_disjoint_and_cover_every_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    for index in 0..7 {
        seed(&repo, &format!("r{index}"), "2024-01-01");
    }
    let service = RecordService::new(repo);

    let mut seen = Vec::new();
    for page in 1..=3 {
        let result = service
            .list_records(&request(&page.to_string(), "3", "", None))
            .unwrap();
        assert!(result.items.len() <= 3);
        seen.extend(result.items.into_iter().map(|record| record.id));
    }
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 7);
}

#[test]
fn empty_collection_has_zero_pages() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    let result = service.list_records(&ListRequest::default()).unwrap();
    assert!(result.items.is_empty());
    assert_eq!(result.total, 0);
    assert_eq!(result.total_pages, 0);
}

#[test]
fn search_is_case_insensitive_on_title_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    seed(&repo, "Record A", "2024-01-01");
    seed(&repo, "Team sync", "2024-01-02");
    let start = NaiveDate::parse_from_str("2024-01-03", "%Y-%m-%d").unwrap();
    repo.create_record(&RecordFields::new("Lunch", start, "record keeping talk").unwrap())
        .unwrap();
    let service = RecordService::new(repo);

    let result = service.list_records(&request("1", "10", "rec", None)).unwrap();
    assert_eq!(titles(&result.items), vec!["Record A"]);
    assert_eq!(result.total, 1);
    assert_eq!(result.total_pages, 1);

    let upper = service.list_records(&request("1", "10", "TEAM", None)).unwrap();
    assert_eq!(titles(&upper.items), vec!["Team sync"]);
}

#[test]
fn search_keeps_whitespace_in_the_needle() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    seed(&repo, "Team sync", "2024-01-01");
    seed(&repo, "Solo", "2024-01-02");
    let service = RecordService::new(repo);

    let space = service.list_records(&request("1", "10", " ", None)).unwrap();
    assert_eq!(titles(&space.items), vec!["Team sync"]);
    assert_eq!(space.total, 1);

    let padded = service.list_records(&request("1", "10", "solo ", None)).unwrap();
    assert!(padded.items.is_empty());
    assert_eq!(padded.total, 0);
    assert_eq!(padded.total_pages, 0);

    let empty = service.list_records(&request("1", "10", "", None)).unwrap();
    assert_eq!(empty.total, 2);
}

#[test]
fn search_total_counts_all_matches_across_pages() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    for index in 0..12 {
        seed(&repo, &format!("match {index}"), "2024-01-01");
    }
    seed(&repo, "other", "2024-01-01");
    let service = RecordService::new(repo);

    let result = service.list_records(&request("2", "5", "MATCH", None)).unwrap();
    assert_eq!(result.items.len(), 5);
    assert_eq!(result.total, 12);
    assert_eq!(result.total_pages, 3);
}

#[test]
fn search_matches_wildcard_characters_literally() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    seed(&repo, "100% done", "2024-01-01");
    seed(&repo, "1000 done", "2024-01-01");
    seed(&repo, "a_b", "2024-01-01");
    seed(&repo, "axb", "2024-01-01");
    let service = RecordService::new(repo);

    let percent = service.list_records(&request("1", "10", "0%", None)).unwrap();
    assert_eq!(titles(&percent.items), vec!["100% done"]);

    let underscore = service.list_records(&request("1", "10", "a_", None)).unwrap();
    assert_eq!(titles(&underscore.items), vec!["a_b"]);
}

#[test]
fn search_handles_non_ascii_case_folding() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    seed(&repo, "ÉTÉ planning", "2024-06-01");
    seed(&repo, "winter", "2024-12-01");
    let service = RecordService::new(repo);

    let result = service.list_records(&request("1", "10", "été", None)).unwrap();
    assert_eq!(titles(&result.items), vec!["ÉTÉ planning"]);
}

#[test]
fn start_desc_orders_by_start_date() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    seed(&repo, "middle", "2024-05-01");
    seed(&repo, "oldest", "2023-12-31");
    seed(&repo, "newest", "2025-01-01");
    let service = RecordService::new(repo);

    let result = service
        .list_records(&request("1", "10", "", Some("startDesc")))
        .unwrap();
    assert_eq!(titles(&result.items), vec!["newest", "middle", "oldest"]);
}

#[test]
fn created_at_desc_is_the_default_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    let a = seed(&repo, "a", "2024-01-01");
    let b = seed(&repo, "b", "2024-01-01");
    let c = seed(&repo, "c", "2024-01-01");
    set_created_at(&conn, a.id, 3_000);
    set_created_at(&conn, b.id, 1_000);
    set_created_at(&conn, c.id, 2_000);
    let service = RecordService::new(repo);

    let explicit = service
        .list_records(&request("1", "10", "", Some("createdAtDesc")))
        .unwrap();
    assert_eq!(titles(&explicit.items), vec!["a", "c", "b"]);

    let absent = service.list_records(&request("1", "10", "", None)).unwrap();
    assert_eq!(titles(&absent.items), vec!["a", "c", "b"]);
}

#[test]
fn equal_created_at_breaks_ties_by_insertion() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    let first = seed(&repo, "first", "2024-01-01");
    let second = seed(&repo, "second", "2024-01-01");
    set_created_at(&conn, first.id, 5_000);
    set_created_at(&conn, second.id, 5_000);
    let service = RecordService::new(repo);

    let result = service.list_records(&ListRequest::default()).unwrap();
    assert_eq!(titles(&result.items), vec!["second", "first"]);
}

#[test]
fn unrecognized_sort_falls_back_to_natural_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    seed(&repo, "one", "2024-03-01");
    seed(&repo, "two", "2024-01-01");
    seed(&repo, "three", "2024-02-01");

    let req = request("1", "10", "", Some("titleAsc"));
    let plan = plan_query(&req);
    assert_eq!(plan.sort, SortOrder::Natural);

    let service = RecordService::new(repo);
    let result = service.list_records(&req).unwrap();
    assert_eq!(result.items.len(), 3);
    assert_eq!(result.total, 3);
}

#[test]
fn find_and_count_honor_the_plan_directly() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    for index in 0..4 {
        seed(&repo, &format!("alpha {index}"), "2024-01-01");
    }
    seed(&repo, "beta", "2024-01-01");

    let plan = plan_query(&ListRequest {
        page: NonZeroU32::new(2).unwrap(),
        limit: NonZeroU32::new(3).unwrap(),
        search: "alpha".to_string(),
        sort: SortOrder::CreatedAtDesc,
    });
    assert_eq!(plan.skip, 3);
    assert_eq!(plan.take, 3);

    let page = repo.find_records(&plan).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(repo.count_records(&plan.filter).unwrap(), 4);
    assert_eq!(repo.count_records(&TitleFilter::All).unwrap(), 5);
}
