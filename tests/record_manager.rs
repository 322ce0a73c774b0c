use chrono::{Duration, NaiveDate, Utc};

use pan_registry::datastore::MemoryDatastore;
use pan_registry::error::Error;
use pan_registry::records::{RecordDraft, RecordManager, RecordPatch};

fn test_dob() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid date")
}

fn draft(name: &str, mobile: &str, aadhaar: &str) -> RecordDraft {
    RecordDraft::new(name, mobile, "PAN24", aadhaar, test_dob())
}

fn numbered_draft(i: usize) -> RecordDraft {
    draft(
        &format!("Applicant {:02}", i),
        &format!("98765{:05}", i),
        &format!("1234567{:05}", i),
    )
}

async fn seeded(count: usize) -> (MemoryDatastore, RecordManager<MemoryDatastore>) {
    let store = MemoryDatastore::new();
    let mut manager = RecordManager::new(store.clone());
    for i in 0..count {
        manager
            .add(&numbered_draft(i))
            .await
            .expect("seed add succeeds")
            .expect("seed draft is complete");
    }
    (store, manager)
}

#[tokio::test]
async fn adding_a_complete_draft_prepends_the_stored_record() {
    let (store, mut manager) = seeded(0).await;

    let first = manager
        .add(&draft("Asha Rao", "9876543210", "111122223333"))
        .await
        .expect("add succeeds")
        .expect("draft is complete");
    let second = manager
        .add(&draft("Vikram Iyer", "9123456780", "222233334444"))
        .await
        .expect("add succeeds")
        .expect("draft is complete");

    assert_eq!(first.custom_id, 1);
    assert_eq!(second.custom_id, 2);
    assert!(!second.id.is_empty());

    // newest first
    assert_eq!(manager.records().len(), 2);
    assert_eq!(manager.records()[0], second);
    assert_eq!(manager.records()[1], first);
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn incomplete_drafts_are_ignored_without_error() {
    let (store, mut manager) = seeded(0).await;

    let missing_mobile = RecordDraft {
        name: "Only Name".to_string(),
        coupon: "PAN24".to_string(),
        aadhaar: "111122223333".to_string(),
        dob: Some(test_dob()),
        ..RecordDraft::default()
    };
    let missing_dob = RecordDraft {
        dob: None,
        ..draft("Asha Rao", "9876543210", "111122223333")
    };

    assert!(manager
        .add(&missing_mobile)
        .await
        .expect("no error")
        .is_none());
    assert!(manager.add(&missing_dob).await.expect("no error").is_none());
    assert!(manager.records().is_empty());
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn malformed_mobiles_are_rejected_before_any_write() {
    let (store, mut manager) = seeded(0).await;

    for bad in ["98765", "98765432101", "98765abcde", "9876 543210"] {
        let err = manager
            .add(&draft("Asha Rao", bad, "111122223333"))
            .await
            .expect_err("mobile should be rejected");
        assert!(matches!(err, Error::InvalidMobile), "mobile {:?}", bad);
        assert!(err.is_validation());
    }

    assert!(manager.records().is_empty());
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn malformed_aadhaars_are_rejected_before_any_write() {
    let (store, mut manager) = seeded(0).await;

    for bad in ["1234", "12345678901", "1234567890123", "12345678901a"] {
        let err = manager
            .add(&draft("Asha Rao", "9876543210", bad))
            .await
            .expect_err("aadhaar should be rejected");
        assert!(matches!(err, Error::InvalidAadhaar), "aadhaar {:?}", bad);
        assert!(err.is_validation());
    }

    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn duplicate_aadhaar_blocks_the_add() {
    let (store, mut manager) = seeded(0).await;

    manager
        .add(&draft("Asha Rao", "9876543210", "111122223333"))
        .await
        .expect("add succeeds")
        .expect("draft is complete");

    let err = manager
        .add(&draft("Somebody Else", "9000000000", "111122223333"))
        .await
        .expect_err("duplicate should be rejected");

    assert!(matches!(err, Error::DuplicateAadhaar));
    assert!(err.is_validation());
    assert_eq!(manager.records().len(), 1);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn next_custom_id_is_one_past_the_current_maximum() {
    let (_store, mut manager) = seeded(3).await;
    assert_eq!(manager.records()[0].custom_id, 3);

    // deleting the record holding the maximum frees its number
    let top_id = manager.records()[0].id.clone();
    assert!(manager.request_delete(&top_id));
    manager.confirm_delete().await.expect("delete succeeds");

    let replacement = manager
        .add(&draft("Replacement", "9555555555", "999988887777"))
        .await
        .expect("add succeeds")
        .expect("draft is complete");
    assert_eq!(replacement.custom_id, 3);
}

#[tokio::test]
async fn only_one_row_edits_at_a_time() {
    let (_store, mut manager) = seeded(2).await;
    let first = manager.records()[0].id.clone();
    let second = manager.records()[1].id.clone();

    assert!(manager.begin_edit(&first));
    assert_eq!(manager.editing_id(), Some(first.as_str()));

    assert!(!manager.begin_edit(&second));
    assert!(manager.begin_edit(&first), "re-entering the same row is fine");
    assert!(!manager.begin_edit("unknown-id"));

    manager.cancel_edit();
    assert_eq!(manager.editing_id(), None);
    assert!(manager.begin_edit(&second));
}

#[tokio::test]
async fn commit_edit_ignores_rows_not_in_edit_mode() {
    let (_store, mut manager) = seeded(2).await;
    let not_editing = manager.records()[1].id.clone();
    let before = manager.records()[1].clone();

    let patch = RecordPatch::new().with_name("Should Not Apply");
    let outcome = manager
        .commit_edit(&not_editing, &patch)
        .await
        .expect("no error");

    assert!(outcome.is_none());
    assert_eq!(manager.records()[1], before);
}

#[tokio::test]
async fn empty_patch_just_leaves_edit_mode() {
    let (_store, mut manager) = seeded(1).await;
    let id = manager.records()[0].id.clone();
    let before = manager.records()[0].clone();

    assert!(manager.begin_edit(&id));
    let outcome = manager
        .commit_edit(&id, &RecordPatch::new())
        .await
        .expect("no error");

    assert!(outcome.is_none());
    assert_eq!(manager.editing_id(), None);
    assert_eq!(manager.records()[0], before);
}

#[tokio::test]
async fn an_edit_keeps_its_own_aadhaar_but_not_anothers() {
    let (_store, mut manager) = seeded(2).await;
    let id = manager.records()[0].id.clone();
    let own_aadhaar = manager.records()[0].aadhaar.clone();
    let other_aadhaar = manager.records()[1].aadhaar.clone();

    assert!(manager.begin_edit(&id));
    let updated = manager
        .commit_edit(
            &id,
            &RecordPatch::new().with_name("Renamed").with_aadhaar(&own_aadhaar),
        )
        .await
        .expect("own aadhaar is accepted")
        .expect("patch applied");
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.aadhaar, own_aadhaar);

    assert!(manager.begin_edit(&id));
    let err = manager
        .commit_edit(&id, &RecordPatch::new().with_aadhaar(&other_aadhaar))
        .await
        .expect_err("another row's aadhaar is rejected");
    assert!(matches!(err, Error::DuplicateAadhaar));
    assert_eq!(manager.editing_id(), Some(id.as_str()));
    assert_eq!(manager.records()[0].aadhaar, own_aadhaar);
}

#[tokio::test]
async fn a_failed_edit_keeps_the_local_record_and_edit_mode() {
    let (_store, mut manager) = seeded(1).await;
    let id = manager.records()[0].id.clone();
    let before = manager.records()[0].clone();

    assert!(manager.begin_edit(&id));
    manager.store().set_failing(true);

    let err = manager
        .commit_edit(&id, &RecordPatch::new().with_mobile("9000000001"))
        .await
        .expect_err("remote write fails");
    assert!(matches!(err, Error::Api { .. }));
    assert!(!err.is_validation());
    assert_eq!(manager.editing_id(), Some(id.as_str()));
    assert_eq!(manager.records()[0], before);

    manager.store().set_failing(false);
    let updated = manager
        .commit_edit(&id, &RecordPatch::new().with_mobile("9000000001"))
        .await
        .expect("retry succeeds")
        .expect("patch applied");
    assert_eq!(updated.mobile, "9000000001");
    assert_eq!(manager.editing_id(), None);
}

#[tokio::test]
async fn delete_needs_its_confirmation_gate() {
    let (store, mut manager) = seeded(2).await;

    assert!(manager
        .confirm_delete()
        .await
        .expect("no gate open")
        .is_none());
    assert!(!manager.request_delete("unknown-id"));

    let id = manager.records()[0].id.clone();
    assert!(manager.request_delete(&id));
    assert_eq!(manager.pending_delete_id(), Some(id.as_str()));

    manager.cancel_delete();
    assert_eq!(manager.pending_delete_id(), None);
    assert_eq!(manager.records().len(), 2);

    assert!(manager.request_delete(&id));
    let deleted = manager
        .confirm_delete()
        .await
        .expect("delete succeeds")
        .expect("gate was open");
    assert_eq!(deleted, id);
    assert_eq!(manager.records().len(), 1);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn rows_in_edit_mode_cannot_be_deleted() {
    let (_store, mut manager) = seeded(2).await;
    let id = manager.records()[0].id.clone();

    assert!(manager.begin_edit(&id));
    assert!(!manager.request_delete(&id));

    manager.cancel_edit();
    assert!(manager.request_delete(&id));
    // and the other way round: a pending delete blocks edit mode
    assert!(!manager.begin_edit(&id));
}

#[tokio::test]
async fn deleting_the_last_row_of_the_last_page_steps_back() {
    let (_store, mut manager) = seeded(21).await;
    assert_eq!(manager.page_count(), 3);

    manager.set_page(3);
    let visible = manager.visible_records();
    assert_eq!(visible.len(), 1);
    let id = visible[0].id.clone();

    assert!(manager.request_delete(&id));
    manager.confirm_delete().await.expect("delete succeeds");

    assert_eq!(manager.records().len(), 20);
    assert_eq!(manager.page(), 2);
    assert_eq!(manager.page_count(), 2);
}

#[tokio::test]
async fn a_failed_delete_closes_the_gate_and_keeps_the_row() {
    let (_store, mut manager) = seeded(2).await;
    let id = manager.records()[0].id.clone();

    assert!(manager.request_delete(&id));
    manager.store().set_failing(true);

    let err = manager
        .confirm_delete()
        .await
        .expect_err("remote delete fails");
    assert!(matches!(err, Error::Api { .. }));
    assert_eq!(manager.pending_delete_id(), None);
    assert_eq!(manager.records().len(), 2);
    assert_eq!(manager.store().len().await, 2);

    manager.store().set_failing(false);
    assert!(manager.request_delete(&id));
    manager.confirm_delete().await.expect("retry succeeds");
    assert_eq!(manager.records().len(), 1);
    assert_eq!(manager.store().len().await, 1);
}

#[tokio::test]
async fn search_is_case_insensitive_over_name_and_mobile() {
    let (_store, mut manager) = seeded(0).await;
    for (name, mobile, aadhaar) in [
        ("Alice Fernandes", "9111111111", "111111111111"),
        ("Bob Verma", "9222222222", "222222222222"),
        ("Carla Alim", "9333333333", "333333333333"),
    ] {
        manager
            .add(&draft(name, mobile, aadhaar))
            .await
            .expect("add succeeds")
            .expect("draft is complete");
    }

    manager.set_filter("ALI");
    let names: Vec<_> = manager
        .visible_records()
        .iter()
        .map(|r| r.name.clone())
        .collect();
    assert_eq!(names, vec!["Carla Alim", "Alice Fernandes"]);

    manager.set_filter("9222");
    assert_eq!(manager.filtered_len(), 1);
    assert_eq!(manager.visible_records()[0].name, "Bob Verma");

    manager.set_filter("no such applicant");
    assert_eq!(manager.filtered_len(), 0);
    assert!(manager.visible_records().is_empty());

    manager.set_filter("");
    assert_eq!(manager.filtered_len(), 3);
}

#[tokio::test]
async fn filter_shrinkage_clamps_the_page() {
    let (_store, mut manager) = seeded(25).await;

    manager.set_page(3);
    assert_eq!(manager.page(), 3);

    // ten matches fit on one page
    manager.set_filter("Applicant 0");
    assert_eq!(manager.filtered_len(), 10);
    assert_eq!(manager.page(), 1);

    manager.set_filter("");
    assert_eq!(manager.page(), 1);
}

#[tokio::test]
async fn pagination_windows_the_filtered_list() {
    let (_store, mut manager) = seeded(25).await;

    assert_eq!(manager.page_size(), 10);
    assert_eq!(manager.page_count(), 3);
    assert_eq!(manager.visible_records().len(), 10);

    manager.set_page(3);
    assert_eq!(manager.visible_records().len(), 5);

    manager.set_page(99);
    assert_eq!(manager.page(), 3);

    manager.next_page();
    assert_eq!(manager.page(), 3);
    manager.prev_page();
    assert_eq!(manager.page(), 2);

    manager.set_page_size(25);
    assert_eq!(manager.page(), 1);
    assert_eq!(manager.page_count(), 1);
    assert_eq!(manager.visible_records().len(), 25);
}

#[tokio::test]
async fn load_failure_leaves_the_mirror_as_it_was() {
    let (store, _) = seeded(3).await;

    let mut manager = RecordManager::new(store);
    manager.store().set_failing(true);
    assert!(manager.load().await.is_err());
    assert!(manager.records().is_empty());

    manager.store().set_failing(false);
    manager.load().await.expect("load succeeds");
    assert_eq!(manager.records().len(), 3);

    // a failed reload keeps the last good mirror
    manager.store().set_failing(true);
    assert!(manager.load().await.is_err());
    assert_eq!(manager.records().len(), 3);
}

#[tokio::test]
async fn dob_survives_store_and_reload() {
    let (store, mut manager) = seeded(0).await;
    let leap_dob = NaiveDate::from_ymd_opt(2000, 2, 29).expect("valid date");
    manager
        .add(&RecordDraft::new(
            "Asha Rao",
            "9876543210",
            "PAN24",
            "111122223333",
            leap_dob,
        ))
        .await
        .expect("add succeeds")
        .expect("draft is complete");

    let mut fresh = RecordManager::new(store.clone());
    fresh.load().await.expect("load succeeds");

    assert_eq!(fresh.records()[0].dob, leap_dob);
    assert_eq!(fresh.records()[0].display_dob(), "29/02/2000");
}

#[tokio::test]
async fn insights_count_totals_and_todays_records() {
    let (store, mut manager) = seeded(3).await;

    // push one record two days into the past, then reload to see it
    let oldest = manager.records()[2].id.clone();
    store.backdate(&oldest, Utc::now() - Duration::days(2)).await;
    manager.load().await.expect("reload succeeds");

    let insights = manager.insights();
    assert_eq!(insights.total_entries, 3);
    assert_eq!(insights.today_entries, 2);
    assert_eq!(insights.processing_rate, 75);

    let remote = manager
        .today_count_remote()
        .await
        .expect("count succeeds");
    assert_eq!(remote, 2);
}

#[tokio::test]
async fn load_replaces_the_mirror_newest_first() {
    let (store, _) = seeded(3).await;

    let mut manager = RecordManager::new(store);
    manager.load().await.expect("load succeeds");

    let custom_ids: Vec<_> = manager.records().iter().map(|r| r.custom_id).collect();
    assert_eq!(custom_ids, vec![3, 2, 1]);
}
