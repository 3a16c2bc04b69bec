//! Presentation projection.
//!
//! Turns a controller [`Snapshot`] into what the user should see. Pure: the same
//! snapshot always yields the same view, so renderers never branch on controller
//! internals.

use super::controller::{FailureReason, Snapshot, SubmissionError, SubmissionState};
use super::fee::FeePreview;
use super::gate::TARGET_CHAIN_ID;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Processing,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormView {
    /// No account: the only affordance is "connect wallet".
    ConnectPrompt { connecting: bool },
    /// Wrong chain: the only affordance is "switch network".
    SwitchNetworkPrompt {
        current_chain_id: Option<u64>,
        target_chain_id: u64,
    },
    Form {
        account: String,
        amount: String,
        preview: Option<FeePreview>,
        notice: Option<Notice>,
        submit_enabled: bool,
    },
}

/// Project a snapshot. `failure_message` replaces the generic transaction failure text.
pub fn project(snapshot: &Snapshot, failure_message: &str) -> FormView {
    let notice = match snapshot.state {
        SubmissionState::NoWallet => {
            return FormView::ConnectPrompt {
                connecting: snapshot.connecting,
            }
        }
        SubmissionState::WrongNetwork => {
            return FormView::SwitchNetworkPrompt {
                current_chain_id: snapshot.chain_id,
                target_chain_id: TARGET_CHAIN_ID,
            }
        }
        SubmissionState::Idle => None,
        SubmissionState::Processing => Some(Notice::Processing),
        SubmissionState::Success => Some(Notice::Success),
        SubmissionState::Failed(FailureReason::Submission(SubmissionError::TransactionFailed)) => {
            Some(Notice::Error(failure_message.to_string()))
        }
        SubmissionState::Failed(reason) => Some(Notice::Error(reason.to_string())),
    };

    FormView::Form {
        account: snapshot.account.clone().unwrap_or_default(),
        amount: snapshot.amount_input.clone(),
        preview: snapshot.preview.as_ref().ok().map(|split| split.preview()),
        notice,
        submit_enabled: snapshot.submit_enabled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::amount::{ContributionAmount, ValidationError};
    use crate::flow::fee::FeeSplit;

    fn snapshot(state: SubmissionState, amount: &str) -> Snapshot {
        Snapshot {
            state,
            amount_input: amount.to_string(),
            preview: ContributionAmount::parse(amount).map(FeeSplit::for_amount),
            account: Some("0xabc".to_string()),
            chain_id: Some(TARGET_CHAIN_ID),
            connecting: false,
            submit_enabled: matches!(state, SubmissionState::Idle | SubmissionState::Failed(_)),
        }
    }

    #[test]
    fn blocked_states_replace_the_form() {
        let mut snap = snapshot(SubmissionState::NoWallet, "1");
        snap.connecting = true;
        assert_eq!(
            project(&snap, "transaction failed"),
            FormView::ConnectPrompt { connecting: true }
        );

        let mut snap = snapshot(SubmissionState::WrongNetwork, "1");
        snap.chain_id = Some(1);
        assert_eq!(
            project(&snap, "transaction failed"),
            FormView::SwitchNetworkPrompt {
                current_chain_id: Some(1),
                target_chain_id: TARGET_CHAIN_ID,
            }
        );
    }

    #[test]
    fn idle_form_shows_live_preview() {
        let view = project(&snapshot(SubmissionState::Idle, "1.5"), "transaction failed");
        let FormView::Form {
            preview,
            notice,
            submit_enabled,
            ..
        } = view
        else {
            panic!("expected form");
        };
        let preview = preview.unwrap();
        assert_eq!(preview.fee, "0.075");
        assert_eq!(preview.net, "1.425");
        assert_eq!(notice, None);
        assert!(submit_enabled);
    }

    #[test]
    fn invalid_input_has_no_preview() {
        let view = project(&snapshot(SubmissionState::Idle, "abc"), "transaction failed");
        assert!(matches!(view, FormView::Form { preview: None, .. }));
    }

    #[test]
    fn processing_disables_submit() {
        let view = project(&snapshot(SubmissionState::Processing, "1"), "transaction failed");
        assert!(matches!(
            view,
            FormView::Form {
                notice: Some(Notice::Processing),
                submit_enabled: false,
                ..
            }
        ));
    }

    #[test]
    fn failures_render_inline_messages() {
        let failed = SubmissionState::Failed(FailureReason::Validation(
            ValidationError::BelowMinimum,
        ));
        let view = project(&snapshot(failed, "0.0001"), "transaction failed");
        assert!(matches!(
            view,
            FormView::Form { notice: Some(Notice::Error(ref m)), submit_enabled: true, .. }
                if m == "below minimum"
        ));

        let failed = SubmissionState::Failed(FailureReason::Submission(
            SubmissionError::TransactionFailed,
        ));
        let view = project(&snapshot(failed, "1"), "Contribution could not be sent");
        assert!(matches!(
            view,
            FormView::Form { notice: Some(Notice::Error(ref m)), .. }
                if m == "Contribution could not be sent"
        ));
    }
}
