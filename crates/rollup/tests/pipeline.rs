//! End-to-end pipeline scenarios over the public facade surface.

use rollup::prelude::*;
use rust_decimal::Decimal;

fn crm_registry() -> SchemaRegistry {
    SchemaRegistry::new()
        .with_entity(
            EntityModel::new("Account")
                .with_field("Id", FieldKind::Text)
                .with_field("AnnualRevenue", FieldKind::Decimal)
                .with_field("OpportunityCount", FieldKind::Uint),
        )
        .with_entity(
            EntityModel::new("Opportunity")
                .with_field("Id", FieldKind::Text)
                .with_field(
                    "AccountId",
                    FieldKind::Relation {
                        target: "Account".into(),
                    },
                )
                .with_field("Amount", FieldKind::Int)
                .with_field("StageName", FieldKind::Text),
        )
}

fn revenue_definition() -> RollupDefinition {
    RollupDefinition::new(
        "Opportunity",
        "Account",
        "AccountId",
        "Amount",
        "AnnualRevenue",
        "Sum",
    )
}

fn opportunity(id: &str, account: &str, amount: i64) -> Record {
    Record::new(id, "Opportunity")
        .with_field("AccountId", account)
        .with_field("Amount", amount)
        .with_field("StageName", "Closed Won")
}

#[test]
fn revenue_round_trip_sums_both_children() {
    let registry = crm_registry();
    let source = StaticDefinitionSource::new(vec![revenue_definition()]);
    let engine = MemoryEngine;
    let rollup = Rollup::new(&registry, &source, &engine);

    let batch = ChangeBatch::insert(
        "Opportunity",
        vec![opportunity("O1", "A1", 100), opportunity("O2", "A1", 150)],
    );
    let parents = rollup
        .rollup_on_change(&batch)
        .expect("round trip should succeed");

    assert_eq!(parents.len(), 1);
    assert_eq!(parents[0].id, RecordId::new("A1"));
    assert_eq!(
        parents[0].field("AnnualRevenue"),
        Some(&Value::Decimal(Decimal::from(250)))
    );
}

#[test]
fn sum_and_count_on_one_relationship_share_one_engine_pass() {
    let registry = crm_registry();
    let source = StaticDefinitionSource::new(vec![
        revenue_definition(),
        RollupDefinition::new(
            "Opportunity",
            "Account",
            "AccountId",
            "Amount",
            "OpportunityCount",
            "Count",
        ),
    ]);
    let engine = MemoryEngine;
    let rollup = Rollup::new(&registry, &source, &engine);

    let batch = ChangeBatch::insert(
        "Opportunity",
        vec![opportunity("O1", "A1", 100), opportunity("O2", "A1", 150)],
    );
    let parents = rollup
        .rollup_on_change(&batch)
        .expect("grouped rollup should succeed");

    assert_eq!(parents.len(), 1);
    assert_eq!(
        parents[0].field("AnnualRevenue"),
        Some(&Value::Decimal(Decimal::from(250)))
    );
    assert_eq!(parents[0].field("OpportunityCount"), Some(&Value::Uint(2)));
}

#[test]
fn facade_error_taxonomy_classifies_configuration_failures() {
    let registry = crm_registry();
    let mut broken = revenue_definition();
    broken.operation_code = "Mode".into();
    let source = StaticDefinitionSource::new(vec![broken]);
    let engine = MemoryEngine;
    let rollup = Rollup::new(&registry, &source, &engine);

    let batch = ChangeBatch::insert("Opportunity", vec![opportunity("O1", "A1", 100)]);
    let err: Error = rollup
        .rollup_on_change(&batch)
        .expect_err("unknown operation code must fail")
        .into();

    assert!(matches!(err.kind, ErrorKind::Config(_)));
    assert!(err.message.contains("Mode"));
}

#[test]
fn filtered_and_unfiltered_definitions_merge_without_clobbering() {
    let registry = crm_registry();
    let source = StaticDefinitionSource::new(vec![
        revenue_definition().with_filter(FilterExpr::Eq {
            field: "StageName".into(),
            value: Value::Text("Closed Won".into()),
        }),
        RollupDefinition::new(
            "Opportunity",
            "Account",
            "AccountId",
            "Amount",
            "OpportunityCount",
            "Count",
        ),
    ]);
    let engine = MemoryEngine;
    let rollup = Rollup::new(&registry, &source, &engine);

    let mut lost = opportunity("O2", "A1", 999);
    lost.set_field("StageName", "Closed Lost");
    let batch = ChangeBatch::insert("Opportunity", vec![opportunity("O1", "A1", 100), lost]);
    let parents = rollup
        .rollup_on_change(&batch)
        .expect("two-context rollup should succeed");

    // Filtered sum sees one child, unfiltered count sees both.
    assert_eq!(parents.len(), 1);
    assert_eq!(
        parents[0].field("AnnualRevenue"),
        Some(&Value::Decimal(Decimal::from(100)))
    );
    assert_eq!(parents[0].field("OpportunityCount"), Some(&Value::Uint(2)));
}
