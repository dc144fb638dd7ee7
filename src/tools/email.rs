//! Approval-gated email tool.

use async_trait::async_trait;
use serde_json::Value;

use super::{string_properties_schema, Tool, ToolOutcome};
use crate::approval::{ApprovalDecision, ApprovalState, PendingAction};

/// Send an email, after a human approves it.
///
/// `execute` only proposes the email; the agent suspends until `resume`
/// is called with the approver's decision.
pub struct SendEmail;

impl SendEmail {
    /// Fields are taken exactly as given; only absent or non-string values
    /// are errors.
    fn proposal(args: &Value) -> anyhow::Result<PendingAction> {
        let field = |key: &str| {
            args.get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("Missing '{}' argument", key))
        };
        Ok(PendingAction::send_email(
            field("email")?,
            field("subject")?,
            field("body")?,
        ))
    }
}

#[async_trait]
impl Tool for SendEmail {
    fn name(&self) -> &str {
        "send_email"
    }

    fn description(&self) -> &str {
        "Send an email. The email is reviewed by a person before it goes out."
    }

    fn parameters_schema(&self) -> Value {
        string_properties_schema(
            &[
                ("email", "Recipient email address"),
                ("subject", "Email subject line"),
                ("body", "Plain-text email body"),
            ],
            &["email", "subject", "body"],
        )
    }

    async fn execute(&self, args: Value) -> anyhow::Result<ToolOutcome> {
        let proposal = Self::proposal(&args)?;
        tracing::info!(
            email = %proposal.email,
            subject = %proposal.subject,
            state = ?ApprovalState::Proposed,
            "Email awaiting approval"
        );
        Ok(ToolOutcome::Interrupt(serde_json::to_value(proposal)?))
    }

    async fn resume(&self, args: Value, decision: Value) -> anyhow::Result<String> {
        let proposal = Self::proposal(&args)?;
        let decision = ApprovalDecision::from_value(&decision);

        match proposal.decide(&decision) {
            (ApprovalState::Approved, email) => {
                tracing::info!(
                    email = %email.email,
                    subject = %email.subject,
                    "Email sent"
                );
                Ok(format!(
                    "Email sent: {} with subject {} and body {}",
                    email.email, email.subject, email.body
                ))
            }
            (_, email) => {
                tracing::info!(email = %email.email, "Email not sent");
                Ok(format!("Email to {} not sent", email.email))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args() -> Value {
        json!({
            "email": "john.doe@example.com",
            "subject": "Claim CLM-2025-001234 opened",
            "body": "We have opened your claim.",
        })
    }

    #[tokio::test]
    async fn execute_proposes_instead_of_sending() {
        let outcome = SendEmail.execute(args()).await.unwrap();
        assert_eq!(
            outcome,
            ToolOutcome::Interrupt(json!({
                "action": "send_email",
                "email": "john.doe@example.com",
                "subject": "Claim CLM-2025-001234 opened",
                "body": "We have opened your claim.",
            }))
        );
    }

    #[tokio::test]
    async fn approved_resume_sends_original_email() {
        let result = SendEmail
            .resume(args(), json!({"approved": true}))
            .await
            .unwrap();
        assert_eq!(
            result,
            "Email sent: john.doe@example.com with subject Claim CLM-2025-001234 opened and body We have opened your claim."
        );
    }

    #[tokio::test]
    async fn approved_resume_uses_edited_subject_and_body() {
        let result = SendEmail
            .resume(
                args(),
                json!({"approved": true, "subject": "Your claim", "body": "Edited body"}),
            )
            .await
            .unwrap();
        assert_eq!(
            result,
            "Email sent: john.doe@example.com with subject Your claim and body Edited body"
        );
    }

    #[tokio::test]
    async fn rejected_or_malformed_resume_does_not_send() {
        for decision in [
            json!({"approved": false}),
            json!("reject"),
            json!(null),
            json!({"subject": "no approval flag"}),
        ] {
            let result = SendEmail.resume(args(), decision).await.unwrap();
            assert_eq!(result, "Email to john.doe@example.com not sent");
        }
    }

    #[tokio::test]
    async fn missing_recipient_is_an_error() {
        let err = SendEmail
            .execute(json!({"subject": "s", "body": "b"}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing 'email' argument");
    }

    #[tokio::test]
    async fn empty_body_is_still_proposed() {
        let outcome = SendEmail
            .execute(json!({"email": "a@b.c", "subject": "S", "body": ""}))
            .await
            .unwrap();
        let ToolOutcome::Interrupt(payload) = outcome else {
            panic!("expected interrupt");
        };
        assert_eq!(payload["body"], "");
    }

    #[tokio::test]
    async fn padded_fields_are_sent_unchanged() {
        let padded = json!({"email": "a@b.c", "subject": " S ", "body": "  Line1\n\n"});
        let result = SendEmail
            .resume(padded, json!({"approved": true}))
            .await
            .unwrap();
        assert_eq!(result, "Email sent: a@b.c with subject  S  and body   Line1\n\n");
    }

    #[tokio::test]
    async fn non_string_field_is_missing() {
        let err = SendEmail
            .execute(json!({"email": "a@b.c", "subject": "S", "body": 42}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing 'body' argument");
    }

    #[tokio::test]
    async fn truthy_approval_sends_and_string_decision_does_not() {
        for decision in [json!({"approved": 1}), json!({"approved": "yes"})] {
            let result = SendEmail.resume(args(), decision).await.unwrap();
            assert!(result.starts_with("Email sent:"), "{}", result);
        }
        let result = SendEmail
            .resume(args(), json!("{\"approved\": true}"))
            .await
            .unwrap();
        assert_eq!(result, "Email to john.doe@example.com not sent");
    }
}
