//! Claim creation.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{str_arg, string_properties_schema, Tool, ToolOutcome};

pub const CLAIM_ID: &str = "CLM-2025-001234";

/// The claim record returned for every creation request.
pub fn claim_record() -> Value {
    json!({
        "claimId": CLAIM_ID,
        "policyNumber": "HO3-77889900",
        "insured": {
            "firstName": "John",
            "lastName": "Doe",
            "phone": "+1-555-238-9021",
            "email": "john.doe@example.com",
            "address": {
                "street": "1245 Westbrook Ave",
                "city": "Austin",
                "state": "TX",
                "zip": "78704"
            }
        },
        "property": {
            "propertyId": "PROP-100178",
            "address": {
                "street": "1245 Westbrook Ave",
                "city": "Austin",
                "state": "TX",
                "zip": "78704"
            },
            "type": "Single Family Home",
            "yearBuilt": 1997,
            "squareFeet": 2650,
            "roofType": "Composition Shingle",
            "numStories": 2,
            "hasBasement": false
        },
        "lossInfo": {
            "dateOfLoss": "2025-02-19T14:35:00",
            "reportedDate": "2025-02-20T09:12:00",
            "causeOfLoss": "Water Damage",
            "description": "Insured reported water leaking from upstairs bathroom resulting in ceiling damage to living room.",
            "mitigationSteps": [
                "Shut off main water valve",
                "Called emergency plumber",
                "Placed buckets to control leaking"
            ]
        },
        "coverage": {
            "coverageA_dwellingLimit": 350000,
            "coverageC_contentsLimit": 90000,
            "deductible": 2500,
            "policyEffective": "2024-06-01",
            "policyExpiration": "2025-06-01"
        },
        "inspection": {
            "inspectionScheduled": true,
            "inspectionDate": "2025-02-22T10:00:00",
            "inspectorName": "Sarah Mitchell"
        },
        "damageAssessment": {
            "roomsAffected": ["Living Room", "Upstairs Bathroom"],
            "estimatedRepairCost": 12840.75,
            "depreciationApplied": 950.00,
            "rcv": 12840.75,
            "acv": 11890.75
        },
        "payments": {
            "initialPaymentIssued": false,
            "amountIssued": 0.0
        },
        "status": "In Review"
    })
}

/// Open a claim from FNOL and policy details.
pub struct CreateClaim;

#[async_trait]
impl Tool for CreateClaim {
    fn name(&self) -> &str {
        "create_claim"
    }

    fn description(&self) -> &str {
        "Create a claim from a given FNOL text. Returns the created claim record including its claimId."
    }

    fn parameters_schema(&self) -> Value {
        string_properties_schema(
            &[
                ("name", "Name of claimant"),
                ("policy_number", "Policy number associated with the claim"),
                ("loss_date", "Date of loss"),
                ("loss_description", "Description of the loss/damage"),
                ("phone", "Claimant's phone number"),
                ("email", "Claimant's email address"),
                (
                    "relation_to_insured",
                    "Relationship to the insured (e.g., self, spouse, tenant)",
                ),
                ("property_id", "Identifier for the property/location"),
                ("loss_cause", "Cause of the reported loss"),
            ],
            &[
                "name",
                "policy_number",
                "loss_date",
                "loss_description",
                "phone",
                "email",
                "relation_to_insured",
                "property_id",
                "loss_cause",
            ],
        )
    }

    async fn execute(&self, args: Value) -> anyhow::Result<ToolOutcome> {
        tracing::info!(
            policy_number = str_arg(&args, "policy_number").unwrap_or("<missing>"),
            loss_cause = str_arg(&args, "loss_cause").unwrap_or("<missing>"),
            claim_id = CLAIM_ID,
            "Creating claim"
        );
        Ok(ToolOutcome::Output(serde_json::to_string_pretty(
            &claim_record(),
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_claim_returns_fixed_claim_regardless_of_input() {
        let from_args = CreateClaim
            .execute(json!({
                "name": "Someone Else",
                "policy_number": "XX-1",
                "loss_cause": "Hail",
            }))
            .await
            .unwrap();
        let from_nothing = CreateClaim.execute(Value::Null).await.unwrap();
        assert_eq!(from_args, from_nothing);

        let ToolOutcome::Output(text) = from_args else {
            panic!("expected output");
        };
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["claimId"], CLAIM_ID);
        assert_eq!(parsed["status"], "In Review");
        assert_eq!(parsed["damageAssessment"]["acv"], 11890.75);
    }
}
