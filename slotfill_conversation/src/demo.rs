//! Ready-made scripts showing slot extraction and the form policy.

use slotfill_core::{GroupSlot, Slot, SlotRegistry, ValueSlot};
use std::sync::Arc;

use crate::actor::Actor;
use crate::conditions::{all_set, always, any_set, regexp};
use crate::error::Result;
use crate::form::{Form, FormState};
use crate::labels::forward;
use crate::script::{Flow, Node, NodeLabel, Script, Transition};
use crate::storage::{register_form_storage, register_storage};
use crate::{processing, response};

/// Request/response pairs the slot demo answers deterministically.
pub const SLOT_DIALOGUE: &[(&str, &str)] = &[
    ("hi", "Write your username (my username is ...):"),
    (
        "my username is groot",
        "Please, type your username again (my username is ...):",
    ),
    ("my username is groot", "Write your email (my email is ...):"),
    (
        "my email is groot@gmail.com",
        "Please, write your email again (my email is ...):",
    ),
    (
        "my email is groot@gmail.com",
        "Please, name me one of your friends: (John Doe)",
    ),
    (
        "Bob Page",
        "Please, name me one of your friends again: (John Doe)",
    ),
    ("Bob Page", "Your friend is called Bob Page"),
    (
        "ok",
        "Your username is groot. Your email is groot@gmail.com.",
    ),
    ("ok", "Finishing query"),
];

fn regexp_slot(name: &str, pattern: &str, group: usize) -> slotfill_core::Result<Slot> {
    Ok(ValueSlot::regexp(name, pattern)?
        .with_target_group(group)
        .into())
}

/// `person` (username, email) and `friend` (first and last name) groups.
pub fn slot_registry() -> slotfill_core::Result<SlotRegistry> {
    let person = GroupSlot::new(
        "person",
        [
            regexp_slot("username", r"username is ([a-zA-Z]+)", 1)?,
            regexp_slot("email", r"email is ([a-z@.A-Z]+)", 1)?,
        ],
    )?;
    let friend = GroupSlot::new(
        "friend",
        [
            regexp_slot("first_name", r"^([A-Z][a-z]+) ", 1)?,
            regexp_slot("last_name", r" ([A-Z][a-z]+)", 1)?,
        ],
    )?;

    let mut registry = SlotRegistry::new();
    registry.register_slots([person, friend]);
    Ok(registry)
}

fn asking_flow(slot: &str, next: Transition, ask: &str, repeat: &str, flow: &str) -> Flow {
    Flow::new()
        .with_local(
            Node::new()
                .with_pre_response_processing("get_slot", processing::extract(&[slot]))
                .with_transition(next.with_priority(1.2))
                .with_transition(Transition::to((flow, "repeat_question"), always()).with_priority(0.8)),
        )
        .with_node("ask", Node::new().with_response(ask))
        .with_node("repeat_question", Node::new().with_response(repeat))
}

/// Script asking for a username, an email and a friend's name in turn.
pub fn slot_script() -> Result<Script> {
    let root = Flow::new()
        .with_node(
            "start",
            Node::new()
                .with_response("")
                .with_transition(Transition::to(("username_flow", "ask"), always())),
        )
        .with_node(
            "fallback",
            Node::new()
                .with_response("Finishing query")
                .with_transition(Transition::to(("username_flow", "ask"), always())),
        )
        .with_node(
            "utter",
            Node::new()
                .with_response(response::fill_template(
                    "Your friend is called {friend.first_name} {friend.last_name}",
                    &[],
                ))
                .with_transition(Transition::to(("root", "utter_alternative"), always())),
        )
        .with_node(
            "utter_alternative",
            Node::new()
                .with_response("Your username is {person.username}. Your email is {person.email}.")
                .with_pre_response_processing("fill", processing::fill_template(&[]))
                .with_transition(Transition::to(("root", "fallback"), always())),
        );

    Ok(Script::new()
        .with_global(Node::new().with_transition(Transition::to(
            ("username_flow", "ask"),
            regexp(r"^[sS]tart")?,
        )))
        .with_flow(
            "username_flow",
            asking_flow(
                "person/username",
                Transition::to(("email_flow", "ask"), all_set(&["person/username"])),
                "Write your username (my username is ...):",
                "Please, type your username again (my username is ...):",
                "username_flow",
            ),
        )
        .with_flow(
            "email_flow",
            asking_flow(
                "person/email",
                Transition::to(
                    ("friend_flow", "ask"),
                    all_set(&["person/username", "person/email"]),
                ),
                "Write your email (my email is ...):",
                "Please, write your email again (my email is ...):",
                "email_flow",
            ),
        )
        .with_flow(
            "friend_flow",
            asking_flow(
                "friend",
                Transition::to(
                    ("root", "utter"),
                    any_set(&["friend/first_name", "friend/last_name"]),
                ),
                "Please, name me one of your friends: (John Doe)",
                "Please, name me one of your friends again: (John Doe)",
                "friend_flow",
            ),
        )
        .with_flow("root", root))
}

pub fn slot_actor() -> Result<Actor> {
    let registry = slot_registry()?;
    let mut actor = Actor::new(
        slot_script()?,
        ("root", "start"),
        ("root", "fallback"),
        Arc::new(registry),
    )?;
    register_storage(&mut actor);
    Ok(actor)
}

pub const CUISINE: &str = "cuisine";
pub const ADDRESS: &str = "restaurantaddress";
pub const NUMBER: &str = "numberofpeople";

pub fn form_registry() -> slotfill_core::Result<SlotRegistry> {
    let mut registry = SlotRegistry::new();
    registry.register_slots([
        regexp_slot(CUISINE, r" ([A-Za-z]+) cuisine", 1)?,
        regexp_slot(ADDRESS, r"(?:at|in) (.+)", 1)?,
        regexp_slot(NUMBER, r"[0-9]+", 0)?,
    ]);
    Ok(registry)
}

#[must_use]
pub fn restaurant_form(allowed_repeats: usize) -> Form {
    Form::new(
        "restaurant",
        [
            (CUISINE, vec![NodeLabel::new("restaurant", "cuisine")]),
            (ADDRESS, vec![NodeLabel::new("restaurant", "address")]),
            (NUMBER, vec![NodeLabel::new("restaurant", "number")]),
        ],
    )
    .with_allowed_repeats(allowed_repeats)
}

/// Chit-chat that turns into a restaurant booking form.
#[must_use]
pub fn form_script(form: &Form) -> Script {
    let slots = [CUISINE, ADDRESS, NUMBER];
    let asking = |slot: &str, question: &str| {
        Node::new()
            .with_response(question)
            .with_pre_transitions_processing("extraction", processing::extract(&[slot]))
    };

    let restaurant = Flow::new()
        .with_node(
            "cuisine",
            asking(CUISINE, "What kind of cuisine would you like to have?"),
        )
        .with_node(
            "address",
            asking(ADDRESS, "In what area would you like to find a restaurant?"),
        )
        .with_node(
            "number",
            asking(NUMBER, "How many people would you like to invite?"),
        )
        .with_node(
            "confirm",
            Node::new()
                .with_response(response::fill_template(
                    "Booking a table for {numberofpeople} people: {cuisine} cuisine, {restaurantaddress}.",
                    &[],
                ))
                .with_pre_transitions_processing("forget", processing::unset(&slots))
                .with_pre_transitions_processing("reset", form.reset())
                .with_transition(Transition::to(("chitchat", "chat_1"), always()).with_priority(2.0)),
        );

    let chitchat = Flow::new()
        .with_local(Node::new().with_transition(Transition::dynamic(forward(Some(0.9)), always())))
        .with_node("chat_1", Node::new().with_response("How's life?"))
        .with_node(
            "chat_2",
            Node::new().with_response("Who do you think will win the Champions League?"),
        )
        .with_node(
            "chat_25",
            asking(CUISINE, "What kind of cuisine do you like?"),
        )
        .with_node(
            "chat_3",
            Node::new()
                .with_response("Did you like the latest Star Wars film?")
                .with_pre_transitions_processing(
                    "activate",
                    form.update_form_state(Some(FormState::Active)),
                ),
        );

    let root = Flow::new()
        .with_node(
            "start",
            Node::new()
                .with_response("")
                .with_transition(Transition::to(("chitchat", "chat_1"), always()).with_priority(2.0)),
        )
        .with_node(
            "fallback",
            Node::new()
                .with_response("Guess, I didn't get what you mean. Anyways, nice chatting with you!")
                .with_transition(Transition::to(("chitchat", "chat_1"), always())),
        );

    Script::new()
        .with_global(
            Node::new()
                .with_transition(
                    Transition::dynamic(form.to_next_label(Some(0.95)), form.is_active()),
                )
                .with_transition(
                    Transition::to(("restaurant", "confirm"), all_set(&slots)).with_priority(0.95),
                )
                .with_pre_transitions_processing("update_form_state", form.update_form_state(None)),
        )
        .with_flow("restaurant", restaurant)
        .with_flow("chitchat", chitchat)
        .with_flow("root", root)
}

pub fn form_actor(allowed_repeats: usize) -> Result<Actor> {
    let form = restaurant_form(allowed_repeats);
    let mut actor = Actor::new(
        form_script(&form),
        ("root", "start"),
        ("root", "fallback"),
        Arc::new(form_registry()?),
    )?;
    register_storage(&mut actor);
    register_form_storage(&mut actor);
    Ok(actor)
}
