mod common;

use common::{TestWorkspace, assert_close, sample_dir};
use pizza_sales::{
    derive::DateErrorPolicy,
    error::PipelineError,
    loader::{LoadOptions, SourceKind, SourcePaths, load_source, load_sources},
    pipeline::{self, PipelineOptions},
    report,
};

fn run_sample() -> pipeline::Analysis {
    pipeline::run(&SourcePaths::in_dir(&sample_dir()), &PipelineOptions::default())
        .expect("sample pipeline")
}

#[test]
fn sample_revenue_matches_filled_line_totals() {
    let analysis = run_sample();
    let records = &analysis.derivation.records;

    let manual: f64 = records.iter().map(|r| r.quantity * r.price).sum();
    assert_close(analysis.summary.total_revenue, manual);
    assert_close(analysis.summary.total_revenue, 216.0);
}

#[test]
fn joined_row_count_equals_order_detail_rows() {
    let sources = load_sources(
        &SourcePaths::in_dir(&sample_dir()),
        &LoadOptions::default(),
    )
    .expect("load");
    let analysis = pipeline::analyze(&sources, &PipelineOptions::default()).expect("analyze");

    assert_eq!(sources.order_details.len(), 11);
    assert_eq!(analysis.joined.len(), 11);
    assert_eq!(analysis.summary.line_items, 11);
}

#[test]
fn missing_quantity_and_unknown_pizza_are_filled() {
    let analysis = run_sample();
    let records = &analysis.derivation.records;

    // order_details_id 6 has a blank quantity
    let blank_quantity = &records[5];
    assert!(blank_quantity.quantity_filled);
    assert_eq!(blank_quantity.quantity, 1.0);

    // order_details_id 11 references a pizza missing from the catalog
    let unknown_pizza = &records[10];
    assert!(unknown_pizza.price_filled);
    assert_eq!(analysis.derivation.fill.price, Some(13.25));
    assert_close(unknown_pizza.total_price, 13.25);
    assert_eq!(unknown_pizza.pizza_type_id, None);
}

#[test]
fn sample_aggregates_are_ranked_and_bucketed() {
    let summary = run_sample().summary;

    let top: Vec<(&str, f64)> = summary
        .top_sellers
        .iter()
        .map(|s| (s.pizza_type_id.as_str(), s.quantity))
        .collect();
    assert_eq!(
        top,
        [
            ("bbq_ckn", 4.0),
            ("hawaiian", 3.0),
            ("spicy_ital", 3.0),
            ("mexicana", 3.0),
            ("five_cheese", 1.0),
        ]
    );

    let hours: Vec<(u32, usize)> = summary.orders_by_hour.into_iter().collect();
    assert_eq!(hours, [(11, 2), (12, 2), (18, 1), (19, 1)]);

    let categories: Vec<&str> = summary
        .sales_by_category
        .iter()
        .map(|c| c.category.as_str())
        .collect();
    assert_eq!(categories, ["Chicken", "Veggie", "Supreme", "Classic", "unknown"]);
    assert_close(summary.sales_by_category[0].total_sales, 59.0);

    let days: Vec<usize> = summary.orders_by_day.iter().map(|d| d.orders).collect();
    assert_eq!(days, [1, 0, 0, 2, 2, 1, 0]);
    assert_eq!(summary.distinct_orders, 7);
}

#[test]
fn sample_recommendations_pick_peaks() {
    let recs = run_sample().recommendations;

    let window = recs.peak_hours.as_ref().expect("peak window");
    assert_eq!((window.start, window.end), (11, 12));
    assert!(window.contiguous);
    assert_eq!(recs.top_sellers.len(), 3);
    assert_eq!(recs.top_category.as_ref().unwrap().category, "Chicken");
    assert_eq!(recs.peak_day.as_ref().unwrap().day, "Thursday");

    let lines = recs.advisories();
    assert!(lines[0].contains("bbq_ckn, hawaiian, spicy_ital"));
    assert!(lines[1].contains("11:00-12:59"));
}

#[test]
fn latin1_ingredients_load_by_default() {
    let frame = load_source(
        SourceKind::PizzaTypes,
        &sample_dir().join("pizza_types.csv"),
        &LoadOptions::default(),
    )
    .expect("load pizza types");
    let ingredients = frame.column("ingredients").expect("ingredients column");
    assert!(ingredients[4].unwrap().contains("Jalapeño Peppers"));
}

#[test]
fn utf8_encoding_rejects_latin1_source() {
    let options = LoadOptions {
        encoding: encoding_rs::UTF_8,
        ..LoadOptions::default()
    };
    let err = load_sources(&SourcePaths::in_dir(&sample_dir()), &options).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::SourceRead {
            kind: SourceKind::PizzaTypes,
            ..
        }
    ));
}

#[test]
fn unit_price_column_is_reconciled() {
    let workspace = TestWorkspace::with_sample();
    let pizzas = std::fs::read_to_string(workspace.path().join("pizzas.csv")).unwrap();
    workspace.replace(
        SourceKind::Pizzas,
        &pizzas.replacen("size,price", "size,unit_price", 1),
    );

    let analysis = pipeline::run(&workspace.paths(), &PipelineOptions::default()).expect("run");

    assert_eq!(
        analysis.reconciliation.price_renamed_from.as_deref(),
        Some("unit_price")
    );
    assert!(analysis.joined.has_column("price"));
    assert!(!analysis.joined.has_column("unit_price"));
    assert_close(analysis.summary.total_revenue, 216.0);
}

#[test]
fn missing_price_column_fails_before_aggregation() {
    let workspace = TestWorkspace::with_sample();
    workspace.replace(
        SourceKind::Pizzas,
        "pizza_id,pizza_type_id,size,cost\nhawaiian_m,hawaiian,M,13.25\n",
    );

    let err = pipeline::run(&workspace.paths(), &PipelineOptions::default()).unwrap_err();
    assert!(matches!(err, PipelineError::SchemaResolution { .. }));
}

#[test]
fn category_in_both_catalogs_keeps_pizza_type_value() {
    let workspace = TestWorkspace::with_sample();
    workspace.replace(
        SourceKind::Pizzas,
        "pizza_id,pizza_type_id,size,price,category\nhawaiian_m,hawaiian,M,13.25,Legacy\n",
    );
    workspace.replace(
        SourceKind::OrderDetails,
        "order_details_id,order_id,pizza_id,quantity\n1,1,hawaiian_m,2\n",
    );

    let analysis = pipeline::run(&workspace.paths(), &PipelineOptions::default()).expect("run");

    assert_eq!(
        analysis.reconciliation.category_dropped.as_deref(),
        Some("category_x")
    );
    assert_eq!(analysis.summary.sales_by_category[0].category, "Classic");
    assert_close(analysis.summary.sales_by_category[0].total_sales, 26.5);
}

#[test]
fn header_only_order_details_produce_zero_aggregates() {
    let workspace = TestWorkspace::with_sample();
    workspace.replace(
        SourceKind::OrderDetails,
        "order_details_id,order_id,pizza_id,quantity\n",
    );

    let analysis = pipeline::run(&workspace.paths(), &PipelineOptions::default()).expect("run");
    let summary = analysis.summary;

    assert_eq!(summary.line_items, 0);
    assert_eq!(summary.total_revenue, 0.0);
    assert!(summary.total_revenue.is_sign_positive());
    let text = report::render_report(&summary, &analysis.recommendations);
    assert!(text.starts_with("Total Revenue: $0.00\n"));
    assert!(!serde_json::to_string(&summary).unwrap().contains("-0.0"));
    assert!(summary.top_sellers.is_empty());
    assert_eq!(summary.orders_by_day.len(), 7);
}

#[test]
fn empty_or_missing_sources_are_read_errors() {
    let workspace = TestWorkspace::with_sample();
    workspace.replace(SourceKind::Orders, "");
    let err = pipeline::run(&workspace.paths(), &PipelineOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::SourceRead {
            kind: SourceKind::Orders,
            ..
        }
    ));

    std::fs::remove_file(workspace.path().join("pizzas.csv")).unwrap();
    let err = pipeline::run(&workspace.paths(), &PipelineOptions::default()).unwrap_err();
    assert!(err.to_string().contains("pizza catalog"));
}

#[test]
fn ragged_rows_are_read_errors() {
    let workspace = TestWorkspace::with_sample();
    workspace.replace(SourceKind::Orders, "order_id,date,time\n1,2015-01-01\n");
    let err = pipeline::run(&workspace.paths(), &PipelineOptions::default()).unwrap_err();
    assert!(matches!(err, PipelineError::SourceRead { .. }));
}

#[test]
fn bad_order_date_aborts_unless_skipping() {
    let workspace = TestWorkspace::with_sample();
    workspace.replace(
        SourceKind::Orders,
        "order_id,date,time\n1,2015-01-01,11:38:36\n2,not-a-date,11:57:40\n",
    );

    let err = pipeline::run(&workspace.paths(), &PipelineOptions::default()).unwrap_err();
    match err {
        PipelineError::DateParse { order_id, date, .. } => {
            assert_eq!(order_id, "2");
            assert_eq!(date, "not-a-date");
        }
        other => panic!("expected DateParse, got {other:?}"),
    }

    let options = PipelineOptions {
        date_policy: DateErrorPolicy::Skip,
        ..PipelineOptions::default()
    };
    let analysis = pipeline::run(&workspace.paths(), &options).expect("skip run");
    // order 2 has three line items, all with unknown timestamps
    assert_eq!(analysis.derivation.skipped_timestamps, 3);
    assert_eq!(analysis.summary.orders_by_hour.get(&11), Some(&1));
}

#[test]
fn reruns_produce_identical_json() {
    let first = serde_json::to_string(&run_sample().summary).unwrap();
    let second = serde_json::to_string(&run_sample().summary).unwrap();
    assert_eq!(first, second);
}
