//! Integration tests for the share-link lifecycle.

mod helpers;

use chrono::Duration;
use uuid::Uuid;

use deckshare_core::error::ErrorKind;
use deckshare_entity::share::{AccessLevel, Liveness, ShareLinkOptions};
use deckshare_service::OwnerContext;

#[tokio::test]
async fn test_create_public_link() {
    let svc = helpers::TestServices::new();
    let owner = OwnerContext::new(Uuid::new_v4());
    let deck = svc.decks.add(owner.user_id);

    let link = svc
        .share_links
        .create(&owner, deck.id, AccessLevel::Public, ShareLinkOptions::default())
        .await
        .unwrap();

    assert_eq!(link.token.len(), 43);
    assert_eq!(link.user_id, owner.user_id);
    assert_eq!(link.expires_at, Some(owner.request_time + Duration::days(30)));
    assert_eq!(svc.share_links.check_liveness(&link), Liveness::Alive);
}

#[tokio::test]
async fn test_create_on_foreign_deck_is_not_found() {
    let svc = helpers::TestServices::new();
    let deck = svc.decks.add(Uuid::new_v4());
    let intruder = OwnerContext::new(Uuid::new_v4());

    let err = svc
        .share_links
        .create(&intruder, deck.id, AccessLevel::Public, ShareLinkOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_whitelisted_requires_recipient_or_list() {
    let svc = helpers::TestServices::new();
    let owner = OwnerContext::new(Uuid::new_v4());
    let deck = svc.decks.add(owner.user_id);

    let err = svc
        .share_links
        .create(&owner, deck.id, AccessLevel::Whitelisted, ShareLinkOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_identifier_sanitized_and_unique_per_owner() {
    let svc = helpers::TestServices::new();
    let alice = OwnerContext::new(Uuid::new_v4());
    let bob = OwnerContext::new(Uuid::new_v4());
    let alice_deck = svc.decks.add(alice.user_id);
    let bob_deck = svc.decks.add(bob.user_id);

    let first = svc
        .share_links
        .create(&alice, alice_deck.id, AccessLevel::Public, ShareLinkOptions::default())
        .await
        .unwrap();
    let second = svc
        .share_links
        .create(&alice, alice_deck.id, AccessLevel::Public, ShareLinkOptions::default())
        .await
        .unwrap();
    let bobs = svc
        .share_links
        .create(&bob, bob_deck.id, AccessLevel::Public, ShareLinkOptions::default())
        .await
        .unwrap();

    let named = svc
        .share_links
        .set_identifier(&alice, &first.token, "My Deck!")
        .await
        .unwrap();
    assert_eq!(named.link_id.as_deref(), Some("my_deck"));

    let err = svc
        .share_links
        .set_identifier(&alice, &second.token, "my deck")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    svc.share_links
        .set_identifier(&bob, &bobs.token, "my_deck")
        .await
        .unwrap();

    let resolved = svc
        .share_links
        .resolve_identifier(alice.user_id, "MY DECK")
        .await
        .unwrap();
    assert_eq!(resolved, first.token);
}

#[tokio::test]
async fn test_set_identifier_on_foreign_link_is_not_found() {
    let svc = helpers::TestServices::new();
    let owner = OwnerContext::new(Uuid::new_v4());
    let deck = svc.decks.add(owner.user_id);
    let link = svc
        .share_links
        .create(&owner, deck.id, AccessLevel::Public, ShareLinkOptions::default())
        .await
        .unwrap();

    let other = OwnerContext::new(Uuid::new_v4());
    let err = svc
        .share_links
        .set_identifier(&other, &link.token, "hijack")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_empty_identifier_rejected() {
    let svc = helpers::TestServices::new();
    let owner = OwnerContext::new(Uuid::new_v4());
    let err = svc
        .share_links
        .set_identifier(&owner, "whatever", "?!")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_revoke_is_owner_scoped_and_idempotent() {
    let svc = helpers::TestServices::new();
    let owner = OwnerContext::new(Uuid::new_v4());
    let deck = svc.decks.add(owner.user_id);
    let link = svc
        .share_links
        .create(&owner, deck.id, AccessLevel::Public, ShareLinkOptions::default())
        .await
        .unwrap();

    let other = OwnerContext::new(Uuid::new_v4());
    svc.share_links.revoke(&other, &link.token).await.unwrap();
    assert!(svc.links.get(&link.token).is_some());

    svc.share_links.revoke(&owner, &link.token).await.unwrap();
    svc.share_links.revoke(&owner, &link.token).await.unwrap();
    assert!(svc.links.get(&link.token).is_none());

    let err = svc.verification.requirements(&link.token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_list_for_deck() {
    let svc = helpers::TestServices::new();
    let owner = OwnerContext::new(Uuid::new_v4());
    let deck = svc.decks.add(owner.user_id);
    let other_deck = svc.decks.add(owner.user_id);
    for _ in 0..2 {
        svc.share_links
            .create(&owner, deck.id, AccessLevel::Public, ShareLinkOptions::default())
            .await
            .unwrap();
    }
    svc.share_links
        .create(&owner, other_deck.id, AccessLevel::Public, ShareLinkOptions::default())
        .await
        .unwrap();

    assert_eq!(svc.share_links.list(&owner, deck.id).await.unwrap().len(), 2);
    let stranger = OwnerContext::new(Uuid::new_v4());
    assert!(svc.share_links.list(&stranger, deck.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_issue_link_code_is_owner_only() {
    let svc = helpers::TestServices::new();
    let owner = OwnerContext::new(Uuid::new_v4());
    let deck = svc.decks.add(owner.user_id);
    let link = svc
        .share_links
        .create(&owner, deck.id, AccessLevel::Restricted, ShareLinkOptions::default())
        .await
        .unwrap();

    let issued = svc.share_links.issue_link_code(&owner, &link.token).await.unwrap();
    assert_eq!(issued.code.len(), 6);
    let stored = svc.links.get(&link.token).unwrap();
    assert_eq!(stored.verification_code.as_deref(), Some(issued.code.as_str()));
    assert_eq!(stored.verification_code_expires_at, Some(issued.expires_at));

    let other = OwnerContext::new(Uuid::new_v4());
    let err = svc
        .share_links
        .issue_link_code(&other, &link.token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
