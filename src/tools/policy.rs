//! Policy lookup tools.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{str_arg, string_properties_schema, Tool, ToolOutcome};

pub const NO_PREVIOUS_CLAIMS: &str = "There are no previous claims for this policy";

/// The policy record returned for every lookup.
pub fn policy_record() -> Value {
    json!({
        "policyNumber": "HO3-77889900",
        "policyType": "HO-3 Homeowners",
        "insured": {
            "insuredId": "INS-552211",
            "firstName": "John",
            "lastName": "Doe",
            "phone": "+1-555-238-9021",
            "email": "john.doe@example.com",
            "mailingAddress": {
                "street": "1245 Westbrook Ave",
                "city": "Austin",
                "state": "TX",
                "zip": "78704"
            }
        },
        "property": {
            "propertyId": "PROP-100178",
            "locationAddress": {
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
            "hasBasement": false,
            "constructionType": "Frame",
            "protectionClass": 4,
            "occupancy": "Owner Occupied"
        },
        "coverage": {
            "effectiveDate": "2024-06-01",
            "expirationDate": "2025-06-01",
            "deductibles": {
                "allPeril": 2500,
                "hurricaneDeductible": null,
                "windHailDeductible": null
            },
            "limits": {
                "coverageA_dwelling": 350000,
                "coverageB_otherStructures": 35000,
                "coverageC_personalProperty": 90000,
                "coverageD_lossOfUse": 35000,
                "coverageE_personalLiability": 300000,
                "coverageF_medicalPayments": 5000
            },
            "endorsements": [
                {
                    "endorsementId": "END-001",
                    "name": "Water Backup and Sump Overflow",
                    "limit": 5000
                },
                {
                    "endorsementId": "END-002",
                    "name": "Special Personal Property Coverage",
                    "limit": null
                }
            ]
        },
        "mortgagee": {
            "name": "First National Bank of Texas",
            "loanNumber": "LN-44332211",
            "address": {
                "street": "3000 Bank Plaza Blvd",
                "city": "Austin",
                "state": "TX",
                "zip": "78705"
            },
            "isPrimaryMortgagee": true
        },
        "underwriting": {
            "riskScore": 72,
            "priorClaims": 0,
            "inspectionStatus": "Completed",
            "lastInspectionDate": "2024-05-20"
        },
        "billing": {
            "paymentPlan": "Monthly",
            "annualPremium": 1675.00,
            "paymentsMade": 8,
            "nextPaymentDue": "2025-03-01"
        },
        "agentsAndContacts": {
            "agentName": "Rebecca Carson",
            "agencyName": "Carson Insurance Group",
            "agentPhone": "+1-555-782-1900",
            "agentEmail": "rebecca.carson@cigagency.com"
        },
        "status": "Active"
    })
}

/// Get policy information by policy number.
pub struct GetPolicyDetails;

#[async_trait]
impl Tool for GetPolicyDetails {
    fn name(&self) -> &str {
        "get_policy_details"
    }

    fn description(&self) -> &str {
        "Get policy information by policy number, including insured, property, coverage limits, deductibles and endorsements."
    }

    fn parameters_schema(&self) -> Value {
        string_properties_schema(&[("policy_number", "The policy number")], &["policy_number"])
    }

    async fn execute(&self, args: Value) -> anyhow::Result<ToolOutcome> {
        tracing::debug!(policy_number = ?str_arg(&args, "policy_number"), "Looking up policy");
        Ok(ToolOutcome::Output(serde_json::to_string_pretty(
            &policy_record(),
        )?))
    }
}

/// Get previous claims by policy number.
pub struct GetPreviousClaims;

#[async_trait]
impl Tool for GetPreviousClaims {
    fn name(&self) -> &str {
        "get_previous_claims_by_policy_number"
    }

    fn description(&self) -> &str {
        "Get previous claims by policy number"
    }

    fn parameters_schema(&self) -> Value {
        string_properties_schema(&[("policy_number", "The policy number")], &["policy_number"])
    }

    async fn execute(&self, args: Value) -> anyhow::Result<ToolOutcome> {
        tracing::debug!(policy_number = ?str_arg(&args, "policy_number"), "Looking up prior claims");
        Ok(ToolOutcome::Output(NO_PREVIOUS_CLAIMS.to_string()))
    }
}
