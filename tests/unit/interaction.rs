use super::*;
use crate::config::{AvatarConfig, BackgroundKind};
use crate::foundation::core::CanvasSize;
use crate::layer::build_layers;

fn blank_surface() -> Compositor {
    let mut comp = Compositor::new(CanvasSize(16)).unwrap();
    comp.set_layers(Vec::new()).unwrap();
    comp
}

fn red_surface() -> Compositor {
    let mut config = AvatarConfig::default();
    config.background.kind = BackgroundKind::Solid;
    config.background.color = "#ff0000".to_string();
    config.ribbon.visible = false;

    let size = CanvasSize(16);
    let mut comp = Compositor::new(size).unwrap();
    comp.set_layers(build_layers(&config, size)).unwrap();
    comp
}

#[test]
fn pan_drag_emits_origin_plus_delta() {
    let surface = blank_surface();
    let mut ic = InteractionController::new();
    ic.set_tool(Tool::Pan);

    let ctx = PointerContext {
        pan_x: 5.0,
        pan_y: -3.0,
        image_offset: None,
    };
    assert_eq!(ic.pointer_down(10.0, 10.0, &ctx, &surface), PointerUpdate::None);
    assert!(ic.is_dragging());

    let update = ic.pointer_move(25.0, 14.0);
    assert_eq!(update, PointerUpdate::Pan { x: 20.0, y: 1.0 });
}

#[test]
fn image_drag_corrects_for_display_scale() {
    let surface = blank_surface();
    let mut ic = InteractionController::new();
    ic.set_selection(Some("image"));
    ic.set_display_scale(2.0);

    let ctx = PointerContext {
        pan_x: 0.0,
        pan_y: 0.0,
        image_offset: Some((3.0, 4.0)),
    };
    ic.pointer_down(0.0, 0.0, &ctx, &surface);
    let update = ic.pointer_move(5.0, 7.0);
    assert_eq!(update, PointerUpdate::ImageOffset { x: 13.0, y: 18.0 });
}

#[test]
fn select_without_image_selection_does_not_drag() {
    let surface = blank_surface();
    let mut ic = InteractionController::new();
    let ctx = PointerContext {
        image_offset: Some((0.0, 0.0)),
        ..Default::default()
    };
    ic.pointer_down(1.0, 1.0, &ctx, &surface);
    assert!(!ic.is_dragging());
    assert_eq!(ic.pointer_move(9.0, 9.0), PointerUpdate::None);
}

#[test]
fn pointer_up_and_leave_end_drags_unconditionally() {
    let surface = blank_surface();
    let mut ic = InteractionController::new();
    ic.set_tool(Tool::Pan);
    ic.pointer_down(0.0, 0.0, &PointerContext::default(), &surface);

    ic.pointer_up();
    assert!(!ic.is_dragging());
    assert_eq!(ic.pointer_move(50.0, 50.0), PointerUpdate::None);

    ic.pointer_down(0.0, 0.0, &PointerContext::default(), &surface);
    ic.pointer_leave();
    assert!(!ic.is_dragging());
}

#[test]
fn switching_tools_ends_the_drag_defensively() {
    let surface = blank_surface();
    let mut ic = InteractionController::new();
    ic.set_tool(Tool::Pan);
    ic.pointer_down(0.0, 0.0, &PointerContext::default(), &surface);
    assert!(ic.is_dragging());

    ic.set_tool(Tool::Select);
    assert!(!ic.is_dragging());
}

#[test]
fn eyedropper_samples_then_exits() {
    let surface = red_surface();
    let mut ic = InteractionController::new();
    ic.set_tool(Tool::Pan);
    ic.begin_eyedropper();
    assert!(ic.eyedropper_active());

    let update = ic.pointer_down(8.0, 8.0, &PointerContext::default(), &surface);
    assert_eq!(update, PointerUpdate::ColorPicked("#ff0000".to_string()));
    assert!(!ic.eyedropper_active());
    // the eyedropper preempted the pan tool: no drag began
    assert!(!ic.is_dragging());
}

#[test]
fn eyedropper_out_of_bounds_is_a_no_op_pick() {
    let surface = blank_surface();
    let mut ic = InteractionController::new();
    ic.begin_eyedropper();
    let update = ic.pointer_down(500.0, 500.0, &PointerContext::default(), &surface);
    assert_eq!(update, PointerUpdate::None);
    assert!(!ic.eyedropper_active());
}
