//! Integration tests for set-state conditions.

use slotfill_core::{
    GroupSlot, SlotRegistry, SlotSession, ValueSlot, all_set, any_set, extract, is_set,
};

fn friend_registry() -> SlotRegistry {
    let first = ValueSlot::regexp("first_name", r"^[A-Z][a-z]+");
    let last = ValueSlot::regexp("last_name", r" ([A-Z][a-z]+)").map(|s| s.with_target_group(1));
    let (Ok(first), Ok(last)) = (first, last) else {
        panic!("test patterns should compile");
    };
    let Ok(friend) = GroupSlot::new("friend", [first.into(), last.into()]) else {
        panic!("group name should be valid");
    };
    let mut registry = SlotRegistry::new();
    registry.register(friend);
    registry
}

fn session_after(registry: &SlotRegistry, input: &str) -> SlotSession {
    let mut ctx = SlotSession::new();
    ctx.add_request(input);
    if extract(&mut ctx, registry, None).is_err() {
        panic!("storage should be initialised");
    }
    ctx
}

#[test]
fn test_all_and_any_over_leaves() {
    let registry = friend_registry();
    let ctx = session_after(&registry, "Bob");
    let leaves = ["friend/first_name", "friend/last_name"];

    assert!(!all_set(leaves).evaluate(&ctx, &registry));
    assert!(any_set(leaves).evaluate(&ctx, &registry));

    let ctx = session_after(&registry, "Bob Page");
    assert!(all_set(leaves).evaluate(&ctx, &registry));
}

#[test]
fn test_group_name_requires_every_leaf() {
    let registry = friend_registry();

    let ctx = session_after(&registry, "Bob");
    assert!(!all_set(["friend"]).evaluate(&ctx, &registry));

    let ctx = session_after(&registry, "Bob Page");
    assert!(all_set(["friend"]).evaluate(&ctx, &registry));
}

#[test]
fn test_unknown_names_and_missing_storage_are_unset() {
    let registry = friend_registry();
    let ctx = session_after(&registry, "Bob Page");
    assert!(!any_set(["nobody"]).evaluate(&ctx, &registry));

    let bare = SlotSession::without_storage();
    assert!(!any_set(["friend"]).evaluate(&bare, &registry));
}

#[test]
fn test_flag_constructor_matches_shortcuts() {
    let registry = friend_registry();
    let ctx = session_after(&registry, "Bob");
    let leaves = ["friend/first_name", "friend/last_name"];

    let Ok(all) = is_set(leaves, true, false) else {
        panic!("single flag should be accepted");
    };
    let Ok(any) = is_set(leaves, false, true) else {
        panic!("single flag should be accepted");
    };
    assert_eq!(all, all_set(leaves));
    assert_eq!(
        any.evaluate(&ctx, &registry),
        any_set(leaves).evaluate(&ctx, &registry)
    );
}
