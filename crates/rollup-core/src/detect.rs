use crate::{
    definition::RollupDefinition,
    record::{ChangeBatch, ChangeOp},
};
use std::collections::BTreeSet;

///
/// Change Detector
///
/// Narrows a definition set to the definitions whose aggregated field
/// actually changed value in an update batch. Insert and delete batches
/// pass through untouched: every declared aggregated field is potentially
/// affected there.
///

/// Return the definitions affected by this batch.
///
/// The scan stops early once every candidate field has been marked changed;
/// an optimization only, correctness just requires every truly-changed
/// field to be found. A row whose previous version is missing marks its
/// candidate fields changed (fail safe toward recomputation).
#[must_use]
pub fn affected_definitions(
    definitions: Vec<RollupDefinition>,
    batch: &ChangeBatch,
) -> Vec<RollupDefinition> {
    if batch.op != ChangeOp::Update {
        return definitions;
    }

    let mut candidates: BTreeSet<&str> = definitions
        .iter()
        .map(|definition| definition.aggregated_field.as_str())
        .collect();
    let mut changed: BTreeSet<String> = BTreeSet::new();

    'rows: for row in &batch.rows {
        let previous = batch.previous(&row.id);

        let resolved: Vec<&str> = candidates
            .iter()
            .copied()
            .filter(|field| match previous {
                Some(old) => row.field(field) != old.field(field),
                // No prior version supplied: assume changed.
                None => true,
            })
            .collect();

        for field in resolved {
            candidates.remove(field);
            changed.insert(field.to_string());
            if candidates.is_empty() {
                break 'rows;
            }
        }
    }

    definitions
        .into_iter()
        .filter(|definition| changed.contains(&definition.aggregated_field))
        .collect()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::affected_definitions;
    use crate::{
        definition::RollupDefinition,
        record::{ChangeBatch, Record},
    };

    fn definition(aggregated_field: &str, target_field: &str) -> RollupDefinition {
        RollupDefinition::new(
            "Opportunity",
            "Account",
            "AccountId",
            aggregated_field,
            target_field,
            "Sum",
        )
    }

    fn row(id: &str, amount: i64, quantity: i64) -> Record {
        Record::new(id, "Opportunity")
            .with_field("Amount", amount)
            .with_field("Quantity", quantity)
    }

    #[test]
    fn insert_batches_pass_definitions_through() {
        let batch = ChangeBatch::insert("Opportunity", vec![row("O1", 100, 1)]);

        let affected = affected_definitions(vec![definition("Amount", "AnnualRevenue")], &batch);
        assert_eq!(affected.len(), 1);
    }

    #[test]
    fn unchanged_update_suppresses_all_definitions() {
        let batch = ChangeBatch::update(
            "Opportunity",
            vec![row("O1", 100, 1)],
            vec![row("O1", 100, 1)],
        );

        let affected = affected_definitions(
            vec![
                definition("Amount", "AnnualRevenue"),
                definition("Quantity", "TotalQuantity"),
            ],
            &batch,
        );
        assert!(affected.is_empty());
    }

    #[test]
    fn only_definitions_on_changed_fields_survive() {
        let batch = ChangeBatch::update(
            "Opportunity",
            vec![row("O1", 150, 1)],
            vec![row("O1", 100, 1)],
        );

        let affected = affected_definitions(
            vec![
                definition("Amount", "AnnualRevenue"),
                definition("Quantity", "TotalQuantity"),
            ],
            &batch,
        );
        assert_eq!(affected.len(), 1);
        assert_eq!(affected[0].aggregated_field, "Amount");
    }

    #[test]
    fn missing_previous_version_counts_as_changed() {
        let batch = ChangeBatch::update("Opportunity", vec![row("O1", 100, 1)], vec![]);

        let affected = affected_definitions(vec![definition("Amount", "AnnualRevenue")], &batch);
        assert_eq!(affected.len(), 1);
    }

    #[test]
    fn later_rows_resolve_fields_earlier_rows_left_unchanged() {
        let batch = ChangeBatch::update(
            "Opportunity",
            vec![row("O1", 100, 1), row("O2", 90, 7)],
            vec![row("O1", 100, 1), row("O2", 90, 2)],
        );

        let affected = affected_definitions(
            vec![
                definition("Amount", "AnnualRevenue"),
                definition("Quantity", "TotalQuantity"),
            ],
            &batch,
        );
        assert_eq!(affected.len(), 1);
        assert_eq!(affected[0].aggregated_field, "Quantity");
    }

    #[test]
    fn field_absent_on_both_versions_is_not_a_change() {
        let old = Record::new("O1", "Opportunity").with_field("Amount", 100i64);
        let new = Record::new("O1", "Opportunity").with_field("Amount", 100i64);
        let batch = ChangeBatch::update("Opportunity", vec![new], vec![old]);

        let affected = affected_definitions(vec![definition("Quantity", "TotalQuantity")], &batch);
        assert!(affected.is_empty());
    }
}
