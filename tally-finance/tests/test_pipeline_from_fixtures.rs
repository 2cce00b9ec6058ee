use std::fs;
use std::path::PathBuf;

use tally_core::{TransactionType, UNCATEGORIZED};
use tally_finance::aggregator::{TOLL_CATEGORY, TOLL_LABEL};
use tally_finance::{CategoryRules, ReportBuilder, RunSummary, SummaryMode, TransferFallback, process_sources};
use tally_ingest::{Source, SourceKind, load_sources};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("fixtures")
        .join(name)
}

fn fixture_sources() -> Vec<Source> {
    vec![
        Source::new(fixture("credit.csv"), SourceKind::Credit),
        Source::new(fixture("debit.csv"), SourceKind::Debit),
    ]
}

fn fixture_rules() -> CategoryRules {
    CategoryRules::load(fixture("categories.json")).unwrap()
}

/// Fixture regression: every row lands where the bank exports say it should.
#[test]
fn test_fixture_transactions() {
    let rules = fixture_rules();
    let loaded = load_sources(&fixture_sources()).unwrap();
    let out = process_sources(&loaded, &rules);

    // 7 card rows (2 tolls) + 5 account rows (1 bill payment) + 1 toll entry
    assert_eq!(out.transactions.len(), 10);
    assert_eq!(out.stats.rows_read, 12);
    assert_eq!(out.stats.skipped_duplicates, 1);
    assert_eq!(out.stats.tolls_grouped, 2);
    assert_eq!(out.stats.malformed_rows, 1);

    let names: Vec<_> = out.transactions.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names[0], "Transferência recebida - Empresa XYZ Ltda");
    assert_eq!(names[1], "Uber *Trip");
    assert_eq!(names[9], TOLL_LABEL);

    let uber = &out.transactions[1];
    assert_eq!(uber.value, -25.0);
    assert_eq!(uber.category, "Transportation");
    assert_eq!(uber.source, "credit.csv");

    // card refunds still count as spending on a credit source
    let refund = out.transactions.iter().find(|t| t.name == "Estorno Uber").unwrap();
    assert_eq!(refund.value, -15.0);

    let pix = out.transactions.iter().find(|t| t.name.contains("Pix")).unwrap();
    assert_eq!(pix.category, UNCATEGORIZED);

    let adjust = out.transactions.iter().find(|t| t.name == "Ajuste de saldo").unwrap();
    assert_eq!(adjust.value, 0.0);
}

#[test]
fn test_type_matches_sign() {
    let rules = fixture_rules();
    let loaded = load_sources(&fixture_sources()).unwrap();
    let out = process_sources(&loaded, &rules);

    for t in &out.transactions {
        assert_eq!(t.transaction_type() == TransactionType::Expense, t.value < 0.0, "{t:?}");
    }
}

#[test]
fn test_bill_payment_contributes_nothing() {
    let rules = fixture_rules();
    let loaded = load_sources(&fixture_sources()).unwrap();
    let out = process_sources(&loaded, &rules);

    assert!(
        !out.transactions
            .iter()
            .any(|t| t.description.to_lowercase().contains("pagamento de fatura"))
    );
    let summary = RunSummary::from_transactions(&out.transactions, &rules);
    assert!((summary.total_expenses - (-446.3)).abs() < 1e-9);
}

#[test]
fn test_single_consolidated_toll() {
    let rules = fixture_rules();
    let loaded = load_sources(&fixture_sources()).unwrap();
    let out = process_sources(&loaded, &rules);

    let tolls: Vec<_> = out
        .transactions
        .iter()
        .filter(|t| t.name.to_lowercase().contains("nutag"))
        .collect();
    assert_eq!(tolls.len(), 1);
    assert!(tolls[0].is_consolidated());
    assert_eq!(tolls[0].category, TOLL_CATEGORY);
    assert!((tolls[0].value - (-18.0)).abs() < 1e-9);
    assert_eq!(tolls[0].date, None);
}

#[test]
fn test_summary_totals() {
    let rules = fixture_rules();
    let loaded = load_sources(&fixture_sources()).unwrap();
    let out = process_sources(&loaded, &rules);
    let summary = RunSummary::from_transactions(&out.transactions, &rules);

    assert_eq!(summary.total_income, 3500.0);
    assert!((summary.net_balance() - 3053.7).abs() < 1e-9);
    assert!((summary.category_total("Transportation") - (-58.0)).abs() < 1e-9);
    assert!((summary.category_total(UNCATEGORIZED) - (-169.0)).abs() < 1e-9);
    assert_eq!(summary.category_count("Education"), 0);

    let sum: f64 = summary.all_by_total().iter().map(|c| c.total).sum();
    assert!((sum - (summary.total_expenses + summary.total_income)).abs() < 1e-9);

    let order: Vec<_> = summary.all_by_total().into_iter().map(|c| c.category).collect();
    assert_eq!(
        order,
        vec![
            UNCATEGORIZED,
            "Health",
            "Transportation",
            "Subscriptions",
            "Food",
            "Education",
            "Income"
        ]
    );
}

#[test]
fn test_transfer_fallback_on_fixtures() {
    let rules = fixture_rules().with_transfer_fallback(TransferFallback::default());
    let loaded = load_sources(&fixture_sources()).unwrap();
    let out = process_sources(&loaded, &rules);

    let pix = out.transactions.iter().find(|t| t.name.contains("Pix")).unwrap();
    assert_eq!(pix.category, "Personal Transfers");
    // keyword rules win over the fallback
    assert_eq!(out.transactions[0].category, "Income");
}

/// Re-reading the written report reproduces the in-memory rows, in order.
#[test]
fn test_report_round_trip() {
    let rules = fixture_rules();
    let loaded = load_sources(&fixture_sources()).unwrap();
    let out = process_sources(&loaded, &rules);
    let summary = RunSummary::from_transactions(&out.transactions, &rules);
    let report = ReportBuilder::new(SummaryMode::Computed).build(&out.transactions, &summary);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("categorized_expenses.csv");
    report.write(&path).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["Date", "Name", "Value", "Category", "Type", "Source"]
    );

    let rows: Vec<csv::StringRecord> = rdr
        .records()
        .take(out.transactions.len())
        .collect::<Result<_, _>>()
        .unwrap();

    for (row, txn) in rows.iter().zip(&out.transactions) {
        assert_eq!(&row[1], txn.name);
        assert_eq!(row[2].parse::<f64>().unwrap(), txn.value);
        assert_eq!(&row[3], txn.category);
        assert_eq!(&row[4], txn.transaction_type().as_str());
        assert_eq!(&row[5], txn.source);
    }
    assert_eq!(rows.len(), out.transactions.len());

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("CATEGORY SUMMARY"));
    assert!(text.contains("Net Balance,3053.70"));
}

/// Single card row, single rule: the smallest end-to-end run.
#[test]
fn test_uber_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let credit = dir.path().join("credit.csv");
    fs::write(&credit, "title,value\nUber Trip,\"25,00\"\n").unwrap();

    let rules = CategoryRules::from_json_str(r#"{"Transportation": ["uber"]}"#).unwrap();
    let sources = vec![
        Source::new(&credit, SourceKind::Credit),
        Source::new(dir.path().join("debit.csv"), SourceKind::Debit),
    ];
    let loaded = load_sources(&sources).unwrap();
    let out = process_sources(&loaded, &rules);

    assert_eq!(out.transactions.len(), 1);
    let txn = &out.transactions[0];
    assert_eq!(txn.name, "Uber Trip");
    assert_eq!(txn.value, -25.0);
    assert_eq!(txn.category, "Transportation");
    assert_eq!(txn.transaction_type(), TransactionType::Expense);
    assert_eq!(txn.source, "credit.csv");

    let summary = RunSummary::from_transactions(&out.transactions, &rules);
    assert_eq!(summary.total_expenses, -25.0);
    assert_eq!(summary.total_income, 0.0);
    assert_eq!(summary.net_balance(), -25.0);
}

#[test]
fn test_no_sources_found() {
    let dir = tempfile::tempdir().unwrap();
    let sources = vec![
        Source::new(dir.path().join("credit.csv"), SourceKind::Credit),
        Source::new(dir.path().join("debit.csv"), SourceKind::Debit),
    ];
    let loaded = load_sources(&sources).unwrap();
    assert!(loaded.is_empty());

    let out = process_sources(&loaded, &fixture_rules());
    assert!(out.transactions.is_empty());
}
