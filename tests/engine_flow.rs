//! End-to-end engine flows
//!
//! These tests drive a full `Picker` through the collaborator interfaces the
//! way a host widget would: seed choices, type queries, navigate, select, and
//! assert on the frames and value sequences the collaborators receive.

use pickr::engine::mock::{MockFormSync, MockRenderer};
use pickr::{
    ChoiceSpec, EmptyState, EngineError, GroupSpec, LoadOutcome, LoadReport, Picker, PickerConfig,
    RemoteBatch, SearchField, SelectError,
};
use serde_json::json;

/// Engine seeded with "Choice 1..count" plus recording collaborators
fn harness(config: PickerConfig, count: usize) -> (Picker, MockRenderer, MockFormSync) {
    let mut picker = Picker::new(config).unwrap();
    picker
        .add_choices(
            (1..=count).map(|n| ChoiceSpec::new(format!("Choice {n}"), format!("Choice {n}"))),
        )
        .unwrap();

    let renderer = MockRenderer::new();
    let sync = MockFormSync::new();
    picker.attach_renderer(renderer.clone());
    picker.attach_form_sync(sync.clone());
    (picker, renderer, sync)
}

fn candidate_labels(renderer: &MockRenderer) -> Vec<String> {
    renderer
        .last()
        .unwrap()
        .candidates
        .iter()
        .map(|c| c.label.clone())
        .collect()
}

#[test]
fn scenario_a_empty_query_lists_everything_highlight_first() {
    let config = PickerConfig::default().with_search_floor(0);
    let (mut picker, renderer, _) = harness(config, 4);

    picker.set_query("").unwrap();
    let first = picker.open().unwrap().unwrap();

    assert_eq!(
        candidate_labels(&renderer),
        vec!["Choice 1", "Choice 2", "Choice 3", "Choice 4"]
    );
    let frame = renderer.last().unwrap();
    assert_eq!(frame.highlighted, Some(first));
    assert_eq!(frame.candidates[0].label, "Choice 1");
    assert!(frame.candidates[0].highlighted);
}

#[test]
fn scenario_b_consuming_every_choice_signals_no_choices() {
    let (mut picker, renderer, sync) = harness(PickerConfig::default(), 4);

    for _ in 0..4 {
        picker.open().unwrap();
        picker.select_highlighted().unwrap().unwrap();
    }

    let frame = renderer.last().unwrap();
    assert!(frame.candidates.is_empty());
    assert_eq!(frame.empty_state, Some(EmptyState::NoChoices));
    assert_eq!(frame.selected.len(), 4);
    assert_eq!(
        sync.last().unwrap(),
        vec!["Choice 1", "Choice 2", "Choice 3", "Choice 4"]
    );
}

#[test]
fn scenario_c_limit_reached_rejects_and_signals() {
    let config = PickerConfig::default().with_max_items(5);
    let (mut picker, renderer, _) = harness(config, 6);
    let ids: Vec<_> = picker.store().choices().iter().map(|c| c.id).collect();

    for &id in &ids[..5] {
        picker.select(id).unwrap();
    }

    let result = picker.select(ids[5]);
    assert_eq!(
        result,
        Err(EngineError::Selection(SelectError::LimitReached { limit: 5 }))
    );
    assert_eq!(picker.selected_ids().len(), 5);

    let frame = renderer.last().unwrap();
    assert!(frame.candidates.is_empty());
    assert_eq!(frame.empty_state, Some(EmptyState::LimitReached { limit: 5 }));
}

#[test]
fn scenario_d_search_by_value_and_by_label_only() {
    // value search: "find me" lives in Choice 3's value
    let mut picker = Picker::new(PickerConfig::default()).unwrap();
    picker
        .add_choices([
            ChoiceSpec::new("Choice 1", "Choice 1"),
            ChoiceSpec::new("Choice 2", "Choice 2"),
            ChoiceSpec::new("Choice 3", "find me please"),
            ChoiceSpec::new("Choice 4", "Choice 4"),
        ])
        .unwrap();

    picker.set_query("find me").unwrap();
    let first = picker.candidates().entries()[0].id;
    assert_eq!(picker.store().choice(first).unwrap().label, "Choice 3");

    // label-only configuration: a value-only string matches nothing
    let config = PickerConfig::default().with_search_fields(vec![SearchField::Label]);
    let mut label_only = Picker::new(config).unwrap();
    label_only
        .add_choices([
            ChoiceSpec::new("label1", "value1"),
            ChoiceSpec::new("label2", "value2"),
        ])
        .unwrap();

    label_only.set_query("value1").unwrap();
    assert!(label_only.candidates().is_empty());
    assert_eq!(
        label_only.candidates().empty_state(),
        Some(&EmptyState::NoResults {
            query: "value1".to_string()
        })
    );

    label_only.set_query("label1").unwrap();
    let first = label_only.candidates().entries()[0].id;
    assert_eq!(label_only.store().choice(first).unwrap().label, "label1");
}

#[test]
fn scenario_e_search_floor_gates_filtering() {
    let config = PickerConfig::default().with_search_floor(10);
    let (mut picker, renderer, _) = harness(config, 4);

    picker.set_query("item 2").unwrap();
    assert_eq!(candidate_labels(&renderer).len(), 4);

    picker.set_query("Choice 2").unwrap(); // eight chars, still below the floor
    assert_eq!(candidate_labels(&renderer).len(), 4);

    picker.set_query("1234567890").unwrap(); // ten chars: filtering activates
    assert!(candidate_labels(&renderer).is_empty());
    assert_eq!(
        renderer.last().unwrap().empty_state,
        Some(EmptyState::NoResults {
            query: "1234567890".to_string()
        })
    );
}

#[test]
fn select_then_remove_restores_candidate_list_exactly() {
    let (mut picker, renderer, _) = harness(PickerConfig::default(), 4);
    picker.open().unwrap();
    let before = renderer.last().unwrap().candidates;

    let id = picker.store().choices()[2].id;
    picker.select(id).unwrap();
    picker.remove(id).unwrap();

    let after = renderer.last().unwrap().candidates;
    assert_eq!(
        before.iter().map(|c| c.id).collect::<Vec<_>>(),
        after.iter().map(|c| c.id).collect::<Vec<_>>()
    );
}

#[test]
fn form_values_are_composed_labels_stay_raw() {
    let config = PickerConfig::default().with_affixes("before-", "-after");
    let (mut picker, renderer, sync) = harness(config, 2);

    let id = picker.store().choices()[1].id;
    picker.select(id).unwrap();

    assert_eq!(sync.last().unwrap(), vec!["before-Choice 2-after"]);
    let frame = renderer.last().unwrap();
    assert_eq!(frame.selected[0].label, "Choice 2");
    assert_eq!(frame.selected[0].value, "Choice 2");
}

#[test]
fn navigation_clamps_at_both_ends() {
    let (mut picker, _, _) = harness(PickerConfig::default(), 3);
    let ids: Vec<_> = picker.store().choices().iter().map(|c| c.id).collect();

    picker.open().unwrap();
    assert_eq!(picker.previous().unwrap(), Some(ids[0])); // no wrap up

    picker.next().unwrap();
    picker.next().unwrap();
    assert_eq!(picker.highlighted(), Some(ids[2]));
    assert_eq!(picker.next().unwrap(), Some(ids[2])); // no wrap down
}

#[test]
fn disabled_choices_rejected_and_never_highlighted() {
    let mut picker = Picker::new(PickerConfig::default()).unwrap();
    let ids = picker
        .add_choices([
            ChoiceSpec::new("Choice 1", "Choice 1").disabled(true),
            ChoiceSpec::new("Choice 2", "Choice 2"),
            ChoiceSpec::new("Choice 3", "Choice 3").disabled(true),
            ChoiceSpec::new("Choice 4", "Choice 4"),
        ])
        .unwrap();

    assert_eq!(
        picker.select(ids[0]),
        Err(EngineError::Selection(SelectError::Disabled(ids[0])))
    );

    // open lands past the disabled head; next skips the disabled middle
    assert_eq!(picker.open().unwrap(), Some(ids[1]));
    assert_eq!(picker.next().unwrap(), Some(ids[3]));
    assert_eq!(picker.previous().unwrap(), Some(ids[1]));
}

#[test]
fn backspace_removal_walks_selection_in_reverse() {
    let (mut picker, _, sync) = harness(PickerConfig::default(), 3);
    let ids: Vec<_> = picker.store().choices().iter().map(|c| c.id).collect();

    picker.select(ids[2]).unwrap();
    picker.select(ids[0]).unwrap();

    assert_eq!(picker.remove_last().unwrap(), Some(ids[0]));
    assert_eq!(sync.last().unwrap(), vec!["Choice 3"]);
    assert_eq!(picker.remove_last().unwrap(), Some(ids[2]));
    assert_eq!(sync.last().unwrap(), Vec::<String>::new());
    assert_eq!(picker.remove_last().unwrap(), None);
}

#[test]
fn group_disappears_when_consumed_and_returns_on_removal() {
    let mut picker = Picker::new(PickerConfig::default()).unwrap();
    let group_a = picker.add_group(GroupSpec::new("Group A")).unwrap();
    let group_b = picker.add_group(GroupSpec::new("Group B")).unwrap();
    let in_a = picker
        .add_choice(ChoiceSpec::new("Choice 1", "Choice 1").with_group(group_a))
        .unwrap();
    picker
        .add_choice(ChoiceSpec::new("Choice 2", "Choice 2").with_group(group_b))
        .unwrap();

    assert_eq!(picker.candidates().groups(), &[group_a, group_b]);

    picker.select(in_a).unwrap();
    assert_eq!(picker.candidates().groups(), &[group_b]);

    picker.remove(in_a).unwrap();
    assert_eq!(picker.candidates().groups(), &[group_a, group_b]);
}

#[test]
fn remote_load_blocks_then_delivers() {
    let (mut picker, renderer, _) = harness(PickerConfig::default(), 0);

    let token = picker.begin_load();
    let frame = renderer.last().unwrap();
    assert!(frame.loading);
    assert!(frame.candidates.is_empty());
    assert_eq!(picker.open(), Err(EngineError::Busy));

    let records = (1..=50)
        .map(|n| json!({"label": format!("Label {n}"), "value": format!("Value {n}")}))
        .collect();
    let outcome = picker.complete_load(token, &RemoteBatch::new("label", "value", records));

    assert_eq!(
        outcome,
        LoadOutcome::Applied(LoadReport {
            added: 50,
            skipped: 0
        })
    );
    let frame = renderer.last().unwrap();
    assert!(!frame.loading);
    assert_eq!(frame.candidates.len(), 50);
    assert_eq!(frame.candidates[0].label, "Label 1");
    assert_eq!(frame.candidates[0].value, "Value 1");
}

#[test]
fn superseded_load_is_dropped() {
    let (mut picker, _, _) = harness(PickerConfig::default(), 0);

    let stale_token = picker.begin_load();
    let fresh_token = picker.begin_load();

    let stale = RemoteBatch::new("label", "value", vec![json!({"label": "Old", "value": "old"})]);
    assert_eq!(picker.complete_load(stale_token, &stale), LoadOutcome::Stale);
    assert!(picker.is_loading());
    assert!(picker.store().is_empty());

    let fresh = RemoteBatch::new("label", "value", vec![json!({"label": "New", "value": "new"})]);
    assert!(matches!(
        picker.complete_load(fresh_token, &fresh),
        LoadOutcome::Applied(_)
    ));
    assert_eq!(picker.store().choices()[0].label, "New");
}

#[test]
fn free_text_entry_creates_and_tears_down() {
    let (mut picker, _, sync) = harness(PickerConfig::default(), 1);

    let id = picker.create_and_select("New Choice", "New Choice").unwrap();
    assert_eq!(sync.last().unwrap(), vec!["New Choice"]);

    picker.remove(id).unwrap();
    // user-created entries leave the store entirely
    assert!(picker.store().choice(id).is_err());
    assert_eq!(picker.candidates().len(), 1);
}

#[test]
fn duplicate_free_text_rejected_when_disallowed() {
    let config = PickerConfig {
        duplicate_items_allowed: false,
        ..PickerConfig::default()
    };
    let (mut picker, _, _) = harness(config, 1);

    let result = picker.create_and_select("Choice 1", "Choice 1");
    assert_eq!(
        result,
        Err(EngineError::Selection(SelectError::DuplicateValue {
            value: "Choice 1".to_string()
        }))
    );
}

#[test]
fn single_mode_keeps_exactly_one_value() {
    let config = PickerConfig::default().single();
    let (mut picker, _, sync) = harness(config, 3);
    let ids: Vec<_> = picker.store().choices().iter().map(|c| c.id).collect();

    picker.select(ids[0]).unwrap();
    picker.select(ids[2]).unwrap();

    assert_eq!(picker.selected_ids(), &[ids[2]]);
    assert_eq!(sync.last().unwrap(), vec!["Choice 3"]);
    // the replaced choice is back in the dropdown
    assert_eq!(picker.candidates().len(), 2);
}

#[test]
fn disabling_the_widget_keeps_state_inert() {
    let (mut picker, renderer, _) = harness(PickerConfig::default(), 2);
    let ids: Vec<_> = picker.store().choices().iter().map(|c| c.id).collect();

    picker.disable();
    assert_eq!(picker.select(ids[0]), Err(EngineError::Disabled));
    assert_eq!(picker.open().unwrap(), None);
    assert!(!renderer.last().unwrap().enabled);

    picker.enable();
    assert_eq!(picker.open().unwrap(), Some(ids[0]));
    picker.select_highlighted().unwrap().unwrap();
    assert_eq!(picker.selected_ids(), &[ids[0]]);
}

#[test]
fn query_change_reanchors_highlight_deterministically() {
    let (mut picker, _, _) = harness(PickerConfig::default(), 4);
    let ids: Vec<_> = picker.store().choices().iter().map(|c| c.id).collect();

    picker.open().unwrap();
    picker.next().unwrap();
    assert_eq!(picker.highlighted(), Some(ids[1]));

    // the highlighted choice survives this narrowing
    picker.set_query("2").unwrap();
    assert_eq!(picker.highlighted(), Some(ids[1]));

    // and is re-anchored to the first candidate when it does not
    picker.set_query("3").unwrap();
    assert_eq!(picker.highlighted(), Some(ids[2]));
}
