//! Integration tests for the slot model and flattening.

use slotfill_core::{GroupSlot, GroupValue, Slot, SlotValue, ValueSlot, flatten_slot_tree};

fn regexp(name: &str, pattern: &str, group: usize) -> Slot {
    match ValueSlot::regexp(name, pattern) {
        Ok(slot) => slot.with_target_group(group).into(),
        Err(e) => panic!("invalid test pattern: {e}"),
    }
}

fn groot_group() -> Slot {
    let children = [
        regexp("name", r"(?<=am ).+?(?=\.)", 0),
        regexp("email", r"[a-zA-Z.]+@[a-zA-Z.]+", 0),
    ];
    match GroupSlot::new("test", children) {
        Ok(group) => group.into(),
        Err(e) => panic!("invalid test group: {e}"),
    }
}

#[test]
fn test_regexp_cases() {
    let cases = [
        ("I am Groot", r"am (.+)", "Groot", true),
        ("My email is groot@gmail.com", r"email is (.+)", "groot@gmail.com", true),
        ("I won't tell you my name", r"name is (.+)$", "", false),
    ];
    for (input, pattern, expected, set) in cases {
        let mut slot = regexp("test", pattern, 1);
        let value = slot.extract_value(input);
        let expected = set.then(|| SlotValue::Text(expected.to_string()));
        assert_eq!(value, expected, "input: {input}");
        assert_eq!(slot.is_set(), set);
        assert_eq!(slot.value(), expected);
    }
}

#[test]
fn test_group_cases() {
    let cases = [
        (
            "I am Groot. My email is groot@gmail.com",
            Some("groot@gmail.com"),
            true,
        ),
        ("I am Groot. I won't tell you my name", None, false),
    ];
    for (input, email, set) in cases {
        let mut slot = groot_group();
        let value = slot.extract_value(input);

        let mut expected = GroupValue::new();
        expected.insert("name".to_string(), Some("Groot".to_string()));
        expected.insert("email".to_string(), email.map(str::to_string));
        assert_eq!(value, Some(SlotValue::Group(expected)));
        assert_eq!(slot.is_set(), set);

        let template = "{name} {email}";
        assert_eq!(slot.fill_template(template) != template, set);
    }
}

#[test]
fn test_group_is_set_matches_children() {
    let mut slot = groot_group();
    for input in [
        "I am Groot. My email is groot@gmail.com",
        "I am Groot. I won't tell you my name",
        "nothing to see",
    ] {
        slot.extract_value(input);
        let children_set = slot.children().iter().all(Slot::is_set);
        assert_eq!(slot.is_set(), children_set, "input: {input}");
    }
}

#[test]
fn test_function_cases() {
    let Ok(word) = ValueSlot::function("test", |msg| msg.split(' ').nth(2).map(str::to_string))
    else {
        panic!("name should be valid");
    };
    let Ok(email) = ValueSlot::function("test", |msg| {
        msg.split(' ').find(|w| w.contains('@')).map(str::to_string)
    }) else {
        panic!("name should be valid");
    };

    let mut word = Slot::from(word);
    let mut email = Slot::from(email);
    assert_eq!(
        word.extract_value("I am Groot"),
        Some(SlotValue::Text("Groot".to_string()))
    );
    assert_eq!(
        email.extract_value("My email is groot@gmail.com"),
        Some(SlotValue::Text("groot@gmail.com".to_string()))
    );
    assert_eq!(email.extract_value("I won't tell you my name"), None);
    assert!(!email.is_set());
}

#[test]
fn test_flatten_every_node_once() {
    let person = |name: &str| -> Slot {
        match GroupSlot::new(
            name,
            [regexp("name", r"am (\w+)", 1), regexp("email", r"\S+@\S+", 0)],
        ) {
            Ok(group) => group.into(),
            Err(e) => panic!("invalid test group: {e}"),
        }
    };
    let Ok(root) = GroupSlot::new("root", [person("person_1"), person("person_2")]) else {
        panic!("group name should be valid");
    };
    let root = Slot::from(root);

    let tree = flatten_slot_tree(&root);
    assert_eq!(tree.len(), 7);
    assert!(tree.add.keys().all(|path| path.starts_with("root")));
    for path in ["root", "root/person_1", "root/person_1/name", "root/person_2/email"] {
        assert!(tree.contains(path), "missing {path}");
    }
}
