use crate::{
    definition::RollupDefinition,
    model::{EntityModel, FieldKind, SchemaRegistry},
};

///
/// CRM fixtures
///
/// Shared Account/Opportunity schema and definition builders used across
/// module tests. Kept deliberately small; tests needing invalid schemas
/// mutate the returned values in place.
///

pub fn crm_registry() -> SchemaRegistry {
    SchemaRegistry::new()
        .with_entity(
            EntityModel::new("Account")
                .with_field("Id", FieldKind::Text)
                .with_field("AnnualRevenue", FieldKind::Decimal)
                .with_field("OpportunityCount", FieldKind::Uint)
                .with_field("SmallestDeal", FieldKind::Decimal)
                .with_field("LargestDeal", FieldKind::Decimal)
                .with_field("AverageDeal", FieldKind::Decimal)
                .with_field("StageList", FieldKind::Text),
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
                .with_field(
                    "OwnerId",
                    FieldKind::Relation {
                        target: "Account".into(),
                    },
                )
                .with_field(
                    "CampaignId",
                    FieldKind::Relation {
                        target: "Campaign".into(),
                    },
                )
                .with_field("Amount", FieldKind::Int)
                .with_field("Quantity", FieldKind::Int)
                .with_field("StageName", FieldKind::Text)
                .with_field("CloseDate", FieldKind::Timestamp),
        )
}

/// Account.AnnualRevenue = Sum(Opportunity.Amount) via AccountId.
pub fn revenue_definition() -> RollupDefinition {
    RollupDefinition::new(
        "Opportunity",
        "Account",
        "AccountId",
        "Amount",
        "AnnualRevenue",
        "Sum",
    )
}

/// Variant of the revenue rollup with another operation and target field.
pub fn definition_with_op(operation_code: &str, target_field: &str) -> RollupDefinition {
    RollupDefinition::new(
        "Opportunity",
        "Account",
        "AccountId",
        "Amount",
        target_field,
        operation_code,
    )
}
