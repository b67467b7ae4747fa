//! A stage driving the headless surface and recording renderer.

use kurbo::Size;
use sketchgraph_core::{
    DirtyFlags, Ellipse, G20, Group, Rectangle, Scene, SerializableColor, Stage, ViewBox,
};
use sketchgraph_render::{HeadlessSurface, PaintRecord, RecordingRenderer};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn stage_with_log() -> (Stage, sketchgraph_render::FrameLog) {
    let renderer = RecordingRenderer::new();
    let log = renderer.log();
    let surface = HeadlessSurface::new(Size::new(200.0, 100.0), renderer);
    let stage = Stage::new(
        Scene::new(),
        Box::new(surface),
        ViewBox::new(0.0, 0.0, 100.0, 50.0),
    )
    .unwrap();
    (stage, log)
}

#[test]
fn test_first_frame_carries_every_node() {
    init_logging();
    let (mut stage, log) = stage_with_log();
    let root = stage.scene().root();
    let group = stage.scene_mut().insert(root, Group::new()).unwrap();
    let circle = stage
        .scene_mut()
        .insert(group, Ellipse::circle(10.0, 4).unwrap())
        .unwrap();

    let changes = stage.render().unwrap();
    assert_eq!(changes.changed.len(), 3);
    assert_eq!(log.len(), 1);

    let frame = log.last().unwrap();
    let id = stage.scene().get(circle).unwrap().id().clone();
    let record = frame.node(id.as_str()).unwrap();
    assert_eq!(record.kind, "ellipse");
    assert!(record.flags.contains(DirtyFlags::VERTICES));
    assert!(record.path.is_some());

    // View box 100x50 on a 200x100 surface scales by two.
    let p = record.transform * kurbo::Point::new(10.0, 0.0);
    assert!((p.x - 20.0).abs() < 1e-9);
}

#[test]
fn test_idle_frames_do_not_reach_the_renderer() {
    let (mut stage, log) = stage_with_log();
    stage.render().unwrap();
    assert!(stage.render().unwrap().is_empty());
    assert_eq!(log.len(), 1);
}

#[test]
fn test_style_edit_records_paint_without_geometry() {
    let (mut stage, log) = stage_with_log();
    let root = stage.scene().root();
    let rect = stage
        .scene_mut()
        .insert(root, Rectangle::new(4.0, 2.0).unwrap())
        .unwrap();
    stage.render().unwrap();

    let red = SerializableColor::new(255, 0, 0, 255);
    stage.scene_mut().node_mut(rect).unwrap().set_fill(red).unwrap();
    stage.render().unwrap();

    let frame = log.last().unwrap();
    let id = stage.scene().get(rect).unwrap().id().clone();
    let record = frame.node(id.as_str()).unwrap();
    assert!(record.flags.contains(DirtyFlags::FILL));
    assert!(record.path.is_none());
    assert_eq!(record.fill, Some(PaintRecord::Solid(red)));
}

#[test]
fn test_resize_refits_root_and_moves_are_recorded() {
    let (mut stage, log) = stage_with_log();
    let root = stage.scene().root();
    let rect = stage
        .scene_mut()
        .insert(root, Rectangle::new(1.0, 1.0).unwrap())
        .unwrap();
    stage.render().unwrap();

    stage.set_size(Size::new(400.0, 200.0));
    stage
        .scene()
        .get(rect)
        .unwrap()
        .set_position(G20::vector(1.0, 0.0))
        .unwrap();
    stage.render().unwrap();

    let frame = log.last().unwrap();
    let id = stage.scene().get(rect).unwrap().id().clone();
    let record = frame.node(id.as_str()).unwrap();
    let origin = record.transform * kurbo::Point::ZERO;
    assert!((origin.x - 4.0).abs() < 1e-9);
}

#[test]
fn test_destroyed_nodes_are_reported_detached() {
    let (mut stage, log) = stage_with_log();
    let root = stage.scene().root();
    let rect = stage
        .scene_mut()
        .insert(root, Rectangle::new(1.0, 1.0).unwrap())
        .unwrap();
    stage.render().unwrap();
    let id = stage.scene().get(rect).unwrap().id().clone();

    stage.scene_mut().destroy(rect).unwrap();
    stage.render().unwrap();
    let frame = log.last().unwrap();
    assert_eq!(frame.detached, vec![id]);
}
