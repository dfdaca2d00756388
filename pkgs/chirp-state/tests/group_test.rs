// Copyright 2026 Chirp Team.
//
// Tests for group lifecycle, membership, and the add-members workflow

use chirp_state::{ChatStore, Error, MessageKind, UserDirectory};

fn store_with_directory() -> ChatStore {
    let mut store = ChatStore::new();
    *store.directory_mut() = UserDirectory::from(vec![
        ("2".to_string(), "Alice Johnson".to_string()),
        ("3".to_string(), "Bob Smith".to_string()),
    ]);
    store
}

#[test]
fn test_create_group_seeds_creator_and_placeholder() {
    let mut store = ChatStore::new();
    let group = store.create_group("Team", None);

    assert_eq!(group.members, vec!["1".to_string()]);
    assert_eq!(group.creator, "1");
    assert_eq!(group.last_message.as_deref(), Some("Group created"));
    assert!(group.last_message_time.is_some());
    assert!(store.group(&group.id).is_some());
}

#[test]
fn test_create_group_derives_deterministic_avatar() {
    let mut store = ChatStore::new();
    let a = store.create_group("Team", None);
    let b = store.create_group("Team", None);

    assert_eq!(a.avatar, "https://api.dicebear.com/7.x/initials/svg?seed=Team");
    assert_eq!(a.avatar, b.avatar);
    assert_ne!(a.id, b.id);
}

#[test]
fn test_create_group_respects_explicit_avatar() {
    let mut store = ChatStore::new();
    let group = store.create_group("Team", Some("custom.png".to_string()));
    assert_eq!(group.avatar, "custom.png");
}

#[test]
fn test_join_group_is_idempotent() {
    let mut store = ChatStore::new();
    let group = store.create_group("Team", None);
    store.leave_group(&group.id).unwrap();

    assert_eq!(store.join_group(&group.id), Ok(true));
    let members_after_first = store.group(&group.id).unwrap().members.len();

    assert_eq!(store.join_group(&group.id), Ok(false));
    assert_eq!(store.group(&group.id).unwrap().members.len(), members_after_first);

    // One departure narration plus exactly one join narration
    let system_joins = store
        .history(&group.id)
        .iter()
        .filter(|m| m.kind == MessageKind::System && m.content == "You joined the group")
        .count();
    assert_eq!(system_joins, 1);
}

#[test]
fn test_join_unknown_group_fails() {
    let mut store = ChatStore::new();
    assert_eq!(
        store.join_group("missing"),
        Err(Error::GroupNotFound("missing".to_string()))
    );
}

#[test]
fn test_leave_group_narrates_and_clears_active() {
    let mut store = ChatStore::new();
    let group = store.create_group("Team", None);
    store.set_active_conversation(&group.id);

    store.leave_group(&group.id).expect("Failed to leave group");

    assert!(!store.group(&group.id).unwrap().is_member("1"));
    assert!(store.active_target().is_none());

    let last = store.history(&group.id).last().unwrap();
    assert_eq!(last.content, "You left the group");
    assert_eq!(last.kind, MessageKind::System);
}

#[test]
fn test_leave_group_keeps_other_active_chat() {
    let mut store = ChatStore::new();
    let team = store.create_group("Team", None);
    let other = store.create_group("Other", None);
    store.set_active_conversation(&other.id);

    store.leave_group(&team.id).unwrap();
    assert!(store.active_target().is_some());
}

#[test]
fn test_add_group_members_skips_existing_and_narrates_new() {
    let mut store = store_with_directory();
    let group = store.create_group("Team", None);
    store.add_group_members(&group.id, &["2".to_string()]).unwrap();

    let added = store
        .add_group_members(
            &group.id,
            &["2".to_string(), "3".to_string(), "1".to_string()],
        )
        .expect("Failed to add members");

    // "2" and "1" (creator) are already members
    assert_eq!(added, vec!["3".to_string()]);
    assert_eq!(store.group(&group.id).unwrap().members.len(), 3);

    let narrations: Vec<&str> = store
        .history(&group.id)
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(
        narrations,
        vec![
            "Alice Johnson has joined the group",
            "Bob Smith has joined the group"
        ]
    );
}

#[test]
fn test_add_group_members_without_profile_stays_silent() {
    let mut store = ChatStore::new();
    let group = store.create_group("Team", None);

    let added = store
        .add_group_members(&group.id, &["9".to_string()])
        .unwrap();

    assert_eq!(added, vec!["9".to_string()]);
    // Unresolvable id joined the membership but produced no narration
    assert!(store.history(&group.id).is_empty());
}

#[test]
fn test_add_group_members_always_clears_selection() {
    let mut store = store_with_directory();
    let group = store.create_group("Team", None);

    store.toggle_user_selection("2");
    store.add_group_members(&group.id, &["2".to_string()]).unwrap();
    assert!(store.selected_users().is_empty());

    store.toggle_user_selection("3");
    let err = store
        .add_group_members("missing", &["3".to_string()])
        .unwrap_err();
    assert_eq!(err, Error::GroupNotFound("missing".to_string()));
    assert!(store.selected_users().is_empty());
}

#[test]
fn test_toggle_user_selection_is_symmetric() {
    let mut store = ChatStore::new();

    store.toggle_user_selection("2");
    store.toggle_user_selection("3");
    assert_eq!(store.selected_users(), ["2".to_string(), "3".to_string()]);

    store.toggle_user_selection("2");
    assert_eq!(store.selected_users(), ["3".to_string()]);
}
