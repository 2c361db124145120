//! Issuance workflow against the in-memory contract.

use std::time::Duration;

use certify_client::blockchain::contract::ContractCall;
use certify_client::blockchain::types::TokenId;
use certify_client::certificates::CertificateRepository;
use certify_client::config::IssuanceConfig;
use certify_client::issuance::{IssuanceError, IssuanceForm, IssuanceStatus, IssuanceWorkflow};
use certify_client::validation::ValidationError;

mod common;
use common::{FakeChain, ALICE, BOB, CONTRACT, ISSUER};

fn form(recipient: &str, course: &str) -> IssuanceForm {
    IssuanceForm {
        recipient_address: recipient.to_string(),
        course_name: course.to_string(),
        recipient_name: "Alice".to_string(),
        achievement_level: "Completion".to_string(),
        metadata_uri: String::new(),
    }
}

const ALICE_HEX: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

#[tokio::test]
async fn test_invalid_address_makes_no_chain_call() {
    let chain = FakeChain::new();
    chain.set_signer(Some(ISSUER));
    let workflow = IssuanceWorkflow::new(chain.clone(), &IssuanceConfig::default());

    let err = workflow.issue(&form("not-an-address", "X")).await.unwrap_err();

    assert!(matches!(
        err,
        IssuanceError::Validation(ValidationError::InvalidAddress(_))
    ));
    assert_eq!(chain.call_count(), 0);
    assert_eq!(chain.submit_count(), 0);
    assert_eq!(workflow.status(), IssuanceStatus::Idle);
}

#[tokio::test]
async fn test_empty_fields_make_no_chain_call() {
    let chain = FakeChain::new();
    chain.set_signer(Some(ISSUER));
    let workflow = IssuanceWorkflow::new(chain.clone(), &IssuanceConfig::default());

    let err = workflow.issue(&form(ALICE_HEX, "   ")).await.unwrap_err();
    assert!(matches!(
        err,
        IssuanceError::Validation(ValidationError::EmptyField("Course name"))
    ));
    assert_eq!(chain.submit_count(), 0);
}

#[tokio::test]
async fn test_issued_certificate_is_owned_by_recipient() {
    let chain = FakeChain::new();
    chain.seed(BOB, "Cooking 101", "Bob");
    chain.set_signer(Some(ISSUER));
    let workflow = IssuanceWorkflow::new(chain.clone(), &IssuanceConfig::default());

    let receipt = workflow.issue(&form(ALICE_HEX, "X")).await.unwrap();
    let minted = receipt.token_id.unwrap();
    assert_eq!(minted.get(), 2);
    assert_eq!(receipt.clear_after, Duration::from_secs(3));

    let repository = CertificateRepository::new(chain.clone(), CONTRACT);
    let owned = repository.get_owned_ids(ALICE).await.unwrap();
    assert!(owned.contains(&minted));

    let certificate = repository.get_certificate(minted).await.unwrap().unwrap();
    assert_eq!(certificate.course_name, "X");
    assert_eq!(certificate.owner, ALICE);
    assert!(certificate.metadata_uri.is_none());

    match workflow.status() {
        IssuanceStatus::Confirmed {
            tx_hash, token_id, ..
        } => {
            assert_eq!(tx_hash, receipt.tx_hash);
            assert_eq!(token_id, Some(minted));
        }
        other => panic!("unexpected status {:?}", other),
    }

    workflow.reset();
    assert_eq!(workflow.status(), IssuanceStatus::Idle);
}

#[tokio::test]
async fn test_unauthorized_issuer_is_rejected() {
    let chain = FakeChain::new();
    chain.set_signer(Some(BOB));
    let workflow = IssuanceWorkflow::new(chain.clone(), &IssuanceConfig::default());

    let err = workflow.issue(&form(ALICE_HEX, "X")).await.unwrap_err();

    match err {
        IssuanceError::Rejected(message) => assert!(message.starts_with("Transaction rejected")),
        other => panic!("unexpected error {:?}", other),
    }
    assert!(matches!(workflow.status(), IssuanceStatus::Failed { .. }));
    assert_eq!(chain.total(), 0);
    assert!(!workflow.is_pending());
}

#[tokio::test]
async fn test_read_only_gateway_cannot_issue() {
    let chain = FakeChain::new();
    let workflow = IssuanceWorkflow::new(chain.clone(), &IssuanceConfig::default());

    let err = workflow.issue(&form(ALICE_HEX, "X")).await.unwrap_err();
    assert!(matches!(err, IssuanceError::Rejected(ref m) if m.contains("issuer wallet")));
}

#[tokio::test]
async fn test_second_submission_refused_while_pending() {
    let chain = FakeChain::new();
    chain.set_signer(Some(ISSUER));
    let gate = chain.hold_confirmations();
    let workflow = IssuanceWorkflow::new(chain.clone(), &IssuanceConfig::default());
    let mut status = workflow.subscribe();

    let first_form = form(ALICE_HEX, "X");
    let second_form = form(ALICE_HEX, "Y");
    let first = workflow.issue(&first_form);
    let second = async {
        status
            .wait_for(|s| matches!(s, IssuanceStatus::PendingConfirmation { .. }))
            .await
            .unwrap();
        assert!(workflow.is_pending());

        let result = workflow.issue(&second_form).await;
        gate.send(true).unwrap();
        result
    };
    let (first, second) = tokio::join!(first, second);

    assert!(first.is_ok());
    assert!(matches!(second, Err(IssuanceError::AlreadyPending)));
    assert_eq!(chain.submit_count(), 1);
    assert_eq!(chain.total(), 1);
    assert!(!workflow.is_pending());
}

#[tokio::test]
async fn test_confirmation_invalidates_cached_reads() {
    let chain = FakeChain::new();
    chain.seed(BOB, "Cooking 101", "Bob");
    chain.set_signer(Some(ISSUER));
    let (gateway, cache) = common::cached(&chain, Duration::from_secs(600));
    let repository = CertificateRepository::new(gateway.clone(), CONTRACT);
    let workflow =
        IssuanceWorkflow::new(gateway, &IssuanceConfig::default()).with_cache(cache.clone());

    assert_eq!(repository.get_total_count().await.unwrap(), 1);
    assert!(repository.get_owned_ids(ALICE).await.unwrap().is_empty());
    assert!(cache.get(&ContractCall::TotalCertifications).is_some());

    workflow.issue(&form(ALICE_HEX, "X")).await.unwrap();

    assert!(cache.get(&ContractCall::TotalCertifications).is_none());
    assert_eq!(repository.get_total_count().await.unwrap(), 2);
    assert_eq!(
        repository.get_owned_ids(ALICE).await.unwrap(),
        vec![TokenId::new(2).unwrap()]
    );
    assert_eq!(chain.calls_to("totalCertifications"), 2);
    assert_eq!(chain.calls_to("getCertifications"), 2);
}
