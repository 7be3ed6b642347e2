//! Component lifecycle and the per-frame update state machine

use crate::foundation::math::Vec3;
use crate::scene::{
    ComponentKind, EditorState, FrameContext, PlayState, SceneError, SceneGraph, TransformComponent,
};
use crate::testing::{count, Hook, RecordingComponent, RecordingPhysics};

const DT: f32 = 0.016;

fn paused_editor() -> PlayState {
    PlayState {
        playing: false,
        paused: true,
    }
}

#[test]
fn test_attached_fires_once_on_add() {
    let mut scene = SceneGraph::new();
    let mut physics = RecordingPhysics::default();
    let node = scene.create_node("node");
    let (component, log) = RecordingComponent::new("Probe");

    let id = scene.add_component(node, component, &mut physics).unwrap();

    assert_eq!(*log.borrow(), vec![Hook::Attached]);
    let stored = scene.node(node).unwrap().component_by_id(id).unwrap();
    assert_eq!(stored.base().owner(), Some(node));
}

#[test]
fn test_delete_then_lookup_is_absent() {
    let mut scene = SceneGraph::new();
    let mut physics = RecordingPhysics::default();
    let node = scene.create_node("node");
    let (component, log) = RecordingComponent::new("Probe");
    scene.add_component(node, component, &mut physics).unwrap();

    assert!(scene.delete_component_by_name(node, "Probe", &mut physics));

    assert!(scene.component_by_name(node, "Probe").is_none());
    assert_eq!(count(&log, |hook| *hook == Hook::CleanUp), 1);
    assert!(!scene.delete_component_by_name(node, "Probe", &mut physics));
    assert_eq!(count(&log, |hook| *hook == Hook::CleanUp), 1);
}

#[test]
fn test_duplicate_names_resolve_to_first() {
    let mut scene = SceneGraph::new();
    let mut physics = RecordingPhysics::default();
    let node = scene.create_node("node");
    let (first, first_log) = RecordingComponent::new("Probe");
    let (second, second_log) = RecordingComponent::new("Probe");
    let first_id = scene.add_component(node, first, &mut physics).unwrap();
    let second_id = scene.add_component(node, second, &mut physics).unwrap();
    assert_ne!(first_id, second_id);

    scene.delete_component_by_name(node, "Probe", &mut physics);

    assert_eq!(count(&first_log, |hook| *hook == Hook::CleanUp), 1);
    assert_eq!(count(&second_log, |hook| *hook == Hook::CleanUp), 0);
    let remaining = scene.node(node).unwrap();
    assert_eq!(remaining.component_count(), 1);
    assert!(remaining.component_by_id(second_id).is_some());
}

#[test]
fn test_second_transform_is_rejected() {
    let mut scene = SceneGraph::new();
    let mut physics = RecordingPhysics::default();
    let node = scene.create_node("node");
    let first = scene.add_component(node, TransformComponent::identity(), &mut physics).unwrap();

    let second = scene.add_component(node, TransformComponent::identity(), &mut physics);

    assert_eq!(second, Err(SceneError::DuplicateTransform(node)));
    assert_eq!(scene.node(node).unwrap().transform_id(), Some(first));
    assert_eq!(scene.node(node).unwrap().component_count(), 1);
}

#[test]
fn test_deleting_transform_clears_cache() {
    let mut scene = SceneGraph::new();
    let mut physics = RecordingPhysics::default();
    let node = scene.create_node("node");
    scene.add_component(node, TransformComponent::identity(), &mut physics).unwrap();

    assert!(scene.delete_component_by_name(node, ComponentKind::Transform.name(), &mut physics));

    assert!(scene.transform(node).is_none());
    assert_eq!(scene.node(node).unwrap().transform_id(), None);
    scene.add_component(node, TransformComponent::identity(), &mut physics).unwrap();
    assert!(scene.transform(node).is_some());
}

#[test]
fn test_paused_editor_delivers_zero_dt() {
    let mut scene = SceneGraph::new();
    let mut physics = RecordingPhysics::default();
    let node = scene.create_node("node");
    let (component, log) = RecordingComponent::new("Probe");
    scene.add_component(node, component, &mut physics).unwrap();

    scene.update(FrameContext::new(DT, paused_editor()), &mut physics);
    scene.update(FrameContext::new(DT, paused_editor()), &mut physics);

    assert_eq!(count(&log, |hook| *hook == Hook::EditorUpdate(0.0)), 2);
    assert_eq!(count(&log, |hook| matches!(hook, Hook::BeginPlay | Hook::EndPlay)), 0);
}

#[test]
fn test_editing_delivers_frame_dt() {
    let mut scene = SceneGraph::new();
    let mut physics = RecordingPhysics::default();
    let node = scene.create_node("node");
    let (component, log) = RecordingComponent::new("Probe");
    scene.add_component(node, component, &mut physics).unwrap();

    scene.update(FrameContext::new(DT, PlayState::EDITING), &mut physics);

    assert_eq!(log.borrow().last(), Some(&Hook::EditorUpdate(DT)));
}

#[test]
fn test_entering_play_begins_without_update() {
    let mut scene = SceneGraph::new();
    let mut physics = RecordingPhysics::default();
    let node = scene.create_node("node");
    let (component, log) = RecordingComponent::new("Probe");
    scene.add_component(node, component, &mut physics).unwrap();
    log.borrow_mut().clear();

    scene.update(FrameContext::new(DT, PlayState::PLAYING), &mut physics);
    assert_eq!(*log.borrow(), vec![Hook::Snapshot, Hook::BeginPlay]);
    assert!(scene.node(node).unwrap().is_playing());

    scene.update(FrameContext::new(DT, PlayState::PLAYING), &mut physics);
    assert_eq!(count(&log, |hook| *hook == Hook::BeginPlay), 1);
    assert_eq!(count(&log, |hook| *hook == Hook::Update(DT)), 1);
}

#[test]
fn test_pause_is_ignored_while_playing() {
    let mut scene = SceneGraph::new();
    let mut physics = RecordingPhysics::default();
    let node = scene.create_node("node");
    let (component, log) = RecordingComponent::new("Probe");
    scene.add_component(node, component, &mut physics).unwrap();

    let mut editor = EditorState::new();
    editor.play();
    scene.update(editor.frame(DT), &mut physics);
    editor.pause();
    scene.update(editor.frame(DT), &mut physics);

    assert_eq!(log.borrow().last(), Some(&Hook::Update(DT)));
}

#[test]
fn test_leaving_play_ends_then_restores() {
    let mut scene = SceneGraph::new();
    let mut physics = RecordingPhysics::default();
    let node = scene.create_node("node");
    let (component, log) = RecordingComponent::new("Probe");
    scene.add_component(node, component, &mut physics).unwrap();

    scene.update(FrameContext::new(DT, PlayState::PLAYING), &mut physics);
    log.borrow_mut().clear();
    scene.update(FrameContext::new(DT, PlayState::EDITING), &mut physics);

    assert_eq!(*log.borrow(), vec![Hook::EndPlay, Hook::Restore]);
    assert!(!scene.node(node).unwrap().is_playing());
}

#[test]
fn test_disabled_component_gets_no_hooks() {
    let mut scene = SceneGraph::new();
    let mut physics = RecordingPhysics::default();
    let node = scene.create_node("node");
    let (component, log) = RecordingComponent::disabled("Probe");
    scene.add_component(node, component, &mut physics).unwrap();
    log.borrow_mut().clear();

    let frames = [
        PlayState::EDITING,
        paused_editor(),
        PlayState::PLAYING,
        PlayState::PLAYING,
        PlayState::EDITING,
    ];
    for play in frames {
        scene.update(FrameContext::new(DT, play), &mut physics);
    }

    assert!(log.borrow().is_empty());
}

#[test]
fn test_children_see_the_same_frame() {
    let mut scene = SceneGraph::new();
    let mut physics = RecordingPhysics::default();
    let parent = scene.create_node("parent");
    let child = scene.create_child(parent, "child").unwrap();
    let (parent_probe, parent_log) = RecordingComponent::new("Probe");
    let (child_probe, child_log) = RecordingComponent::new("Probe");
    scene.add_component(parent, parent_probe, &mut physics).unwrap();
    scene.add_component(child, child_probe, &mut physics).unwrap();

    scene.update(FrameContext::new(DT, PlayState::PLAYING), &mut physics);

    assert_eq!(count(&parent_log, |hook| *hook == Hook::BeginPlay), 1);
    assert_eq!(count(&child_log, |hook| *hook == Hook::BeginPlay), 1);
    assert!(scene.node(child).unwrap().is_playing());
}

#[test]
fn test_update_node_only_touches_subtree() {
    let mut scene = SceneGraph::new();
    let mut physics = RecordingPhysics::default();
    let first = scene.create_node("first");
    let second = scene.create_node("second");
    let (first_probe, first_log) = RecordingComponent::new("Probe");
    let (second_probe, second_log) = RecordingComponent::new("Probe");
    scene.add_component(first, first_probe, &mut physics).unwrap();
    scene.add_component(second, second_probe, &mut physics).unwrap();

    scene
        .update_node(second, FrameContext::new(DT, PlayState::EDITING), &mut physics)
        .unwrap();

    assert_eq!(count(&first_log, |hook| matches!(hook, Hook::EditorUpdate(_))), 0);
    assert_eq!(count(&second_log, |hook| matches!(hook, Hook::EditorUpdate(_))), 1);
}

#[test]
fn test_play_mode_leaves_edit_transform_untouched() {
    let mut scene = SceneGraph::new();
    let mut physics = RecordingPhysics::default();
    let node = scene.create_node("node");
    scene
        .add_component(node, TransformComponent::from_position(Vec3::new(0.0, 5.0, 0.0)), &mut physics)
        .unwrap();

    scene.update(FrameContext::new(DT, PlayState::PLAYING), &mut physics);
    if let Some(transform) = scene.transform_mut(node) {
        transform.set_position(Vec3::new(9.0, 9.0, 9.0));
    }
    scene.update(FrameContext::new(DT, PlayState::EDITING), &mut physics);

    let transform = scene.transform(node).unwrap();
    assert_eq!(transform.position(), Vec3::new(0.0, 5.0, 0.0));
    assert!(!transform.has_snapshot());
}

#[test]
fn test_clean_up_twice_is_safe() {
    let mut scene = SceneGraph::new();
    let mut physics = RecordingPhysics::default();
    let node = scene.create_node("node");
    let (component, log) = RecordingComponent::new("Probe");
    scene.add_component(node, component, &mut physics).unwrap();

    scene.clean_up(node, &mut physics);
    scene.clean_up(node, &mut physics);

    assert_eq!(count(&log, |hook| *hook == Hook::CleanUp), 1);
    assert_eq!(scene.node(node).unwrap().component_count(), 0);
}
