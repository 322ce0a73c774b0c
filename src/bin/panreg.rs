use std::time::Duration;

use chrono::NaiveDate;

use pan_registry::prelude::*;
use pan_registry::records::{parse_dob_input, Debouncer};

fn dob(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn print_rows(rows: &[&Record]) {
    for record in rows {
        println!(
            "  #{:<3} {:<16} {}  {}  dob {}",
            record.custom_id,
            record.name,
            record.mobile,
            record.aadhaar,
            record.display_dob()
        );
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut manager = RecordManager::new(MemoryDatastore::new());

    println!("Starting registry walkthrough (in-memory store)");

    // Example 1: add records with client-assigned display numbers
    println!("\nExample 1: Adding applicant records");

    let applicants = [
        ("Asha Rao", "9876543210", "PAN24", "111122223333", "1992-11-05"),
        ("Vikram Iyer", "9123456780", "PAN24", "222233334444", "1988-03-14"),
        ("Meena Kumari", "9988776655", "AGENT7", "333344445555", "1995-06-15"),
        ("Ravi Sharma", "9012345678", "PAN24", "444455556666", "1979-12-30"),
        ("Divya Nair", "9765432109", "AGENT7", "555566667777", "2000-02-29"),
        ("Arjun Menon", "9345678901", "PAN24", "666677778888", "1985-08-21"),
        ("Lakshmi Pillai", "9234567890", "AGENT7", "777788889999", "1991-01-09"),
    ];

    for (name, mobile, coupon, aadhaar, dob_input) in applicants {
        let draft = RecordDraft::new(name, mobile, coupon, aadhaar, parse_dob_input(dob_input)?);
        if let Some(record) = manager.add(&draft).await? {
            println!("Added #{}: {}", record.custom_id, record.name);
        }
    }

    // Example 2: submissions the validator turns away
    println!("\nExample 2: Rejected submissions");

    let bad_mobile = RecordDraft::new(
        "Kiran Joshi",
        "98765",
        "PAN24",
        "888899990000",
        dob(1990, 4, 3),
    );
    match manager.add(&bad_mobile).await {
        Err(err) => println!("Rejected: {}", err),
        Ok(_) => println!("Unexpectedly accepted"),
    }

    let duplicate = RecordDraft::new(
        "Asha Clone",
        "9876500000",
        "PAN24",
        "111122223333",
        dob(1990, 4, 3),
    );
    match manager.add(&duplicate).await {
        Err(err) => println!("Rejected: {}", err),
        Ok(_) => println!("Unexpectedly accepted"),
    }

    let incomplete = RecordDraft {
        name: "No Mobile".to_string(),
        ..RecordDraft::default()
    };
    if manager.add(&incomplete).await?.is_none() {
        println!("Incomplete draft ignored without an error");
    }

    // Example 3: a fresh session loads the collection newest-first
    println!("\nExample 3: Loading the collection into a new session");

    let mut session = RecordManager::new(manager.store().clone());
    session.load().await?;
    println!("Loaded {} records:", session.records().len());
    print_rows(&session.visible_records());

    // Example 4: debounced search, only the settled term filters
    println!("\nExample 4: Searching");

    let (mut debouncer, mut terms) = Debouncer::new(Duration::from_millis(300));
    debouncer.push("m");
    debouncer.push("me");
    debouncer.push("meena");
    if let Some(term) = terms.recv().await {
        println!("Settled search term: {:?}", term);
        manager.set_filter(&term);
    }
    print_rows(&manager.visible_records());

    manager.set_filter("91");
    println!("Mobile digits \"91\" match {} records", manager.filtered_len());
    manager.set_filter("");

    // Example 5: pagination over the full list
    println!("\nExample 5: Pagination");

    manager.set_page_size(3);
    println!(
        "Page size 3 gives {} pages of {} records",
        manager.page_count(),
        manager.filtered_len()
    );
    manager.next_page();
    println!("Page {}:", manager.page());
    print_rows(&manager.visible_records());

    // Example 6: editing behind the edit-mode gate
    println!("\nExample 6: Editing a record");

    let target_id = manager.records()[0].id.clone();
    if manager.begin_edit(&target_id) {
        println!("Editing {}", manager.records()[0].name);
        println!(
            "Delete while editing allowed? {}",
            manager.request_delete(&target_id)
        );

        let patch = RecordPatch::new().with_mobile("9000000001");
        if let Some(updated) = manager.commit_edit(&target_id, &patch).await? {
            println!("Mobile now {}", updated.mobile);
        }
    }

    // Example 7: deletion goes through the confirmation gate
    println!("\nExample 7: Deleting with confirmation");

    let last_page = manager.page_count();
    manager.set_page(last_page);
    let victim_id = manager.visible_records()[0].id.clone();

    manager.request_delete(&victim_id);
    manager.cancel_delete();
    println!("Cancelled: still {} records", manager.records().len());

    manager.request_delete(&victim_id);
    if let Some(id) = manager.confirm_delete().await? {
        println!(
            "Deleted {}; page {} of {} after step-back",
            id,
            manager.page(),
            manager.page_count()
        );
    }

    // Example 8: metrics
    println!("\nExample 8: Insights");

    let insights = manager.insights();
    println!(
        "{} total entries, {} today, processing rate {}%",
        insights.total_entries, insights.today_entries, insights.processing_rate
    );
    println!("Store-side count for today: {}", manager.today_count_remote().await?);

    println!("\nRegistry walkthrough completed");

    Ok(())
}
